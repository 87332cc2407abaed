//! End-to-end checks of ellipse classification through the public API.

use std::cell::RefCell;
use std::rc::Rc;

use geoscope::*;
use proptest::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ellipse(major: f64, minor: f64) -> Rc<EllipseGraphics> {
    let ellipse = EllipseGraphics::new();
    ellipse.set_semi_major_axis(Some(ConstantProperty::shared(major)));
    ellipse.set_semi_minor_axis(Some(ConstantProperty::shared(minor)));
    Rc::new(ellipse)
}

fn entity_at(id: &str, center: DVec3, shape: Rc<EllipseGraphics>) -> Rc<Entity> {
    let entity = Entity::new(id);
    entity.set_position(Some(ConstantProperty::shared(center)));
    entity.set_ellipse(Some(shape));
    Rc::new(entity)
}

/// Collects every event raised by an updater, in order.
fn record(updater: &EllipseGeometryUpdater) -> (Rc<RefCell<Vec<String>>>, Vec<Subscription>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let fill = {
        let log = Rc::clone(&log);
        updater.geometry_changed().subscribe(move |c: &GeometryChanged| {
            log.borrow_mut()
                .push(format!("fill {} <- {}", c.classification, c.previous));
        })
    };
    let outline = {
        let log = Rc::clone(&log);
        updater
            .outline_geometry_changed()
            .subscribe(move |o: &bool| log.borrow_mut().push(format!("outline {o}")))
    };
    (log, vec![fill, outline])
}

#[test]
fn test_lifecycle_of_one_entity() {
    init_logging();
    let shape = ellipse(100.0, 50.0);
    let entity = entity_at("tracked", DVec3::new(1.0, 0.0, 0.0), Rc::clone(&shape));
    let updater = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");
    let (log, _subs) = record(&updater);

    shape.set_outline(Some(ConstantProperty::shared(true)));
    shape.set_height(Some(CallbackProperty::shared(|t: JulianDate| {
        t.seconds_since(JulianDate::J2000)
    })));
    shape.set_height(Some(ConstantProperty::shared(10.0)));
    shape.set_show(Some(ConstantProperty::shared(false)));
    entity.set_ellipse(None);

    assert_eq!(
        *log.borrow(),
        vec![
            "fill COLOR <- COLOR",
            "outline true",
            "fill DYNAMIC <- COLOR",
            "outline false",
            "fill COLOR <- DYNAMIC",
            "outline true",
            "fill NONE <- COLOR",
            "outline false",
        ]
    );
}

#[test]
fn test_entity_without_shape_is_none_regardless_of_history() {
    init_logging();
    let shape = ellipse(100.0, 50.0);
    shape.set_outline(Some(ConstantProperty::shared(true)));
    shape.set_material(Some(Rc::new(MaterialProperty::Image(
        ImageMaterialProperty::default(),
    ))));
    let entity = entity_at("e", DVec3::ZERO, shape);
    let updater = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");
    assert_eq!(updater.classification(), Classification::Material);
    assert!(updater.is_outlined());

    entity.set_ellipse(None);
    assert_eq!(updater.classification(), Classification::None);
    assert!(!updater.is_outlined());
}

#[test]
fn test_shape_attached_after_creation() {
    init_logging();
    let entity = Rc::new(Entity::new("late"));
    let updater = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");
    assert_eq!(updater.classification(), Classification::None);

    entity.set_ellipse(Some(ellipse(3.0, 2.0)));
    assert_eq!(updater.classification(), Classification::None);

    entity.set_position(Some(ConstantProperty::shared(DVec3::Y)));
    assert_eq!(updater.classification(), Classification::Color);
    assert_eq!(updater.options().center, DVec3::Y);
}

#[test]
fn test_fill_and_outline_instances_sample_request_time() {
    init_logging();
    let shape = ellipse(100.0, 50.0);
    let noon = JulianDate::J2000;
    shape.set_outline(Some(ConstantProperty::shared(true)));
    shape.set_outline_color(Some(CallbackProperty::shared(move |t: JulianDate| {
        if t < noon {
            Color::GREEN
        } else {
            Color::RED
        }
    })));
    shape.set_material(Some(Rc::new(MaterialProperty::solid(Color::BLUE))));
    let updater =
        EllipseGeometryUpdater::new(entity_at("e", DVec3::ZERO, shape)).expect("entity given");

    let fill = updater
        .create_fill_instance(noon.add_seconds(60.0))
        .expect("static fill");
    assert_eq!(fill.attributes.color, Some(ColorAttribute::from(Color::BLUE)));

    let early = updater
        .create_outline_instance(JulianDate::MINIMUM)
        .expect("static outline");
    let late = updater
        .create_outline_instance(noon.add_seconds(60.0))
        .expect("static outline");
    assert_eq!(early.attributes.color, Some(ColorAttribute::from(Color::GREEN)));
    assert_eq!(late.attributes.color, Some(ColorAttribute::from(Color::RED)));
    assert_eq!(early.geometry, late.geometry);
}

#[test]
fn test_two_updaters_on_one_entity_are_independent() {
    init_logging();
    let shape = ellipse(10.0, 5.0);
    let entity = entity_at("shared", DVec3::ZERO, Rc::clone(&shape));
    let first = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");
    let second = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");

    first.dispose();
    shape.set_rotation(Some(CallbackProperty::shared(|_| 0.3)));

    assert_eq!(first.classification(), Classification::Color);
    assert_eq!(second.classification(), Classification::Dynamic);
}

#[test]
fn test_missing_entity_is_invalid_argument() {
    let err = EllipseGeometryUpdater::new(None::<Rc<Entity>>).unwrap_err();
    assert_eq!(err.to_string(), "invalid argument: entity is required");
}

proptest! {
    #[test]
    fn prop_constant_shapes_snapshot_sampled_values(
        minor in 0.1f64..1.0e5,
        extra in 0.0f64..1.0e5,
        x in -1.0e7f64..1.0e7,
        y in -1.0e7f64..1.0e7,
        rotation in proptest::option::of(-6.3f64..6.3),
        height in proptest::option::of(0.0f64..1.0e4),
        textured in any::<bool>(),
    ) {
        let major = minor + extra;
        let shape = ellipse(major, minor);
        shape.set_rotation(rotation.map(ConstantProperty::shared));
        shape.set_height(height.map(ConstantProperty::shared));
        if textured {
            shape.set_material(Some(Rc::new(MaterialProperty::Image(ImageMaterialProperty::default()))));
        }
        let center = DVec3::new(x, y, 0.0);
        let updater = EllipseGeometryUpdater::new(entity_at("p", center, shape)).expect("entity given");

        let expected = if textured { Classification::Material } else { Classification::Color };
        prop_assert_eq!(updater.classification(), expected);

        let options = updater.options();
        prop_assert_eq!(options.center, center);
        prop_assert_eq!(options.semi_major_axis, major);
        prop_assert_eq!(options.semi_minor_axis, minor);
        prop_assert_eq!(options.rotation, rotation);
        prop_assert_eq!(options.height, height);
        prop_assert!(updater.create_fill_instance(JulianDate::J2000).is_ok());
    }

    #[test]
    fn prop_any_varying_shape_property_is_dynamic(which in 0usize..8) {
        let shape = ellipse(10.0, 5.0);
        let entity = entity_at("p", DVec3::ZERO, Rc::clone(&shape));
        let updater = EllipseGeometryUpdater::new(Rc::clone(&entity)).expect("entity given");

        let varying = || CallbackProperty::shared(|_| 1.0_f64);
        match which {
            0 => entity.set_position(Some(CallbackProperty::shared(|_| DVec3::ONE))),
            1 => shape.set_semi_major_axis(Some(varying())),
            2 => shape.set_semi_minor_axis(Some(varying())),
            3 => shape.set_rotation(Some(varying())),
            4 => shape.set_height(Some(varying())),
            5 => shape.set_extruded_height(Some(varying())),
            6 => shape.set_granularity(Some(varying())),
            _ => shape.set_st_rotation(Some(varying())),
        }
        prop_assert_eq!(updater.classification(), Classification::Dynamic);
    }
}
