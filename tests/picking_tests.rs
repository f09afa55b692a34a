// Host-side tests for pointer rays, hit-testing and highlight resolution.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec2, Vec3};
use globe_core::{
    ray_sphere, ray_unit_box, Camera, CameraConfig, GeoCoordinate, GroupRotation, MarkerFactory,
    MarkerRecord, MarkerRegistry, MarkerStyle, PointerHitTester, PointerState, Ray, Viewport,
    GLOBE_RADIUS,
};

const VIEWPORT: Viewport = Viewport {
    width: 800.0,
    height: 600.0,
};

/// Latitude whose surface point sits at y = 1, level with the camera eye.
fn eye_level_lat() -> f32 {
    (1.0 / GLOBE_RADIUS).asin().to_degrees()
}

fn camera() -> Camera {
    Camera::from_config(&CameraConfig::default(), VIEWPORT.aspect())
}

fn registry_of(records: &[(&str, f32, f32)]) -> MarkerRegistry {
    let factory = MarkerFactory::new(GLOBE_RADIUS, MarkerStyle::default());
    let mut registry = MarkerRegistry::new();
    for (i, (name, lat, lng)) in records.iter().enumerate() {
        let rec = MarkerRecord::new(*name, GeoCoordinate::new(*lat, *lng), 100_000_000.0);
        registry.insert(factory.build(&rec, i).unwrap());
    }
    registry
}

#[test]
fn ray_sphere_basics() {
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 10.0),
        dir: Vec3::NEG_Z,
    };
    let t = ray_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
    assert!((t - 9.0).abs() < 1e-5);

    let inside = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::X,
    };
    assert_eq!(ray_sphere(&inside, Vec3::ZERO, 1.0), Some(0.0));

    let away = Ray {
        origin: Vec3::new(0.0, 0.0, 10.0),
        dir: Vec3::Z,
    };
    assert!(ray_sphere(&away, Vec3::ZERO, 1.0).is_none());

    let wide = Ray {
        origin: Vec3::new(3.0, 0.0, 10.0),
        dir: Vec3::NEG_Z,
    };
    assert!(ray_sphere(&wide, Vec3::ZERO, 1.0).is_none());
}

#[test]
fn ray_unit_box_reports_world_distance() {
    let ray = Ray {
        origin: Vec3::new(0.0, 0.0, 5.0),
        dir: Vec3::NEG_Z,
    };
    let t = ray_unit_box(&ray, &Mat4::IDENTITY).unwrap();
    assert!((t - 4.5).abs() < 1e-5);

    // Scaling the box does not rescale the returned distance.
    let t = ray_unit_box(&ray, &Mat4::from_scale(Vec3::splat(2.0))).unwrap();
    assert!((t - 4.0).abs() < 1e-5);

    let miss = Ray {
        origin: Vec3::new(2.0, 0.0, 5.0),
        dir: Vec3::NEG_Z,
    };
    assert!(ray_unit_box(&miss, &Mat4::IDENTITY).is_none());

    let inside = Ray {
        origin: Vec3::ZERO,
        dir: Vec3::NEG_Z,
    };
    let t = ray_unit_box(&inside, &Mat4::IDENTITY).unwrap();
    assert!((t - 0.5).abs() < 1e-5);

    let degenerate = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
    assert!(ray_unit_box(&ray, &degenerate).is_none());
}

#[test]
fn camera_centre_ray_looks_down_negative_z() {
    let cam = camera();
    let ray = cam.ray_from_ndc(Vec2::ZERO).unwrap();
    assert!((ray.origin - Vec3::new(0.0, 1.0, 15.0)).length() < 1e-5);
    assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
    assert!(cam.ray_from_ndc(Vec2::new(f32::NAN, 0.0)).is_none());

    let ndc = cam.project_to_ndc(Vec3::new(0.0, 1.0, 0.0));
    assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
}

#[test]
fn pointer_normalization() {
    let p = PointerState::from_client(400.0, 300.0, VIEWPORT);
    assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
    let p = PointerState::from_client(0.0, 0.0, VIEWPORT);
    assert_eq!((p.x, p.y), (-1.0, 1.0));
    let p = PointerState::from_client(800.0, 600.0, VIEWPORT);
    assert_eq!((p.x, p.y), (1.0, -1.0));
    assert!(!PointerState::from_client(1.0, 1.0, Viewport::new(0.0, 0.0)).is_valid());
    assert_eq!(
        VIEWPORT.ndc_to_pixels(Vec2::new(-1.0, 1.0)),
        Vec2::new(0.0, 0.0)
    );
}

#[test]
fn centre_pointer_hits_marker_at_eye_level() {
    let lat = eye_level_lat();
    let mut registry = registry_of(&[("Front", lat, 0.0)]);
    let result = PointerHitTester::new().resolve(
        &PointerState::default(),
        &camera(),
        Quat::IDENTITY,
        &mut registry,
        VIEWPORT,
    );
    assert_eq!(result.hit, Some(0));
    let t = result.distance.unwrap();
    assert!(t > 9.5 && t < 10.5, "t = {t}");

    let tooltip = result.tooltip.as_ref().unwrap();
    assert_eq!(tooltip.label, "Front");
    assert_eq!(tooltip.metric, "100,000,000");
    assert_eq!(tooltip.screen_position, Vec2::new(400.0, 300.0));

    let frame = result.tooltip_frame();
    assert!(frame.visible);
    assert_eq!(frame.label.as_deref(), Some("Front"));
    assert!(registry.get(0).unwrap().is_highlighted());
}

#[test]
fn nearest_marker_wins_regardless_of_order() {
    let lat = eye_level_lat();
    let cam = camera();
    let tester = PointerHitTester::new();

    let back_first = registry_of(&[("Back", lat, 180.0), ("Front", lat, 0.0)]);
    let (i, t) = tester
        .pick(&PointerState::default(), &cam, Quat::IDENTITY, &back_first)
        .unwrap();
    assert_eq!(i, 1);
    assert!(t < 12.0);

    let front_first = registry_of(&[("Front", lat, 0.0), ("Back", lat, 180.0)]);
    let (i, _) = tester
        .pick(&PointerState::default(), &cam, Quat::IDENTITY, &front_first)
        .unwrap();
    assert_eq!(i, 0);

    // Half a turn of the group swaps which one faces the camera.
    let half_turn = Quat::from_rotation_y(std::f32::consts::PI);
    let (i, _) = tester
        .pick(&PointerState::default(), &cam, half_turn, &front_first)
        .unwrap();
    assert_eq!(i, 1);
}

#[test]
fn equal_distances_keep_first_inserted() {
    let lat = eye_level_lat();
    let registry = registry_of(&[("First", lat, 0.0), ("Second", lat, 0.0)]);
    let (i, _) = PointerHitTester::new()
        .pick(&PointerState::default(), &camera(), Quat::IDENTITY, &registry)
        .unwrap();
    assert_eq!(i, 0);
}

#[test]
fn markers_flagged_untestable_are_skipped() {
    let lat = eye_level_lat();
    let mut registry = registry_of(&[("First", lat, 0.0), ("Second", lat, 0.0)]);
    registry.iter_mut().next().unwrap().hit_testable = false;
    let (i, _) = PointerHitTester::new()
        .pick(&PointerState::default(), &camera(), Quat::IDENTITY, &registry)
        .unwrap();
    assert_eq!(i, 1);
}

#[test]
fn nan_pointer_is_a_miss_and_dims_everything() {
    let lat = eye_level_lat();
    let mut registry = registry_of(&[("Front", lat, 0.0)]);
    let tester = PointerHitTester::new();
    let cam = camera();

    tester.resolve(
        &PointerState::default(),
        &cam,
        Quat::IDENTITY,
        &mut registry,
        VIEWPORT,
    );
    assert_eq!(registry.highlighted(), Some(0));

    let result = tester.resolve(
        &PointerState::new(f32::NAN, f32::NAN),
        &cam,
        Quat::IDENTITY,
        &mut registry,
        VIEWPORT,
    );
    assert_eq!(result.hit, None);
    assert!(result.tooltip.is_none());
    assert!(!result.tooltip_frame().visible);
    assert!(registry.iter().all(|m| !m.is_highlighted()));
}

#[test]
fn at_most_one_marker_is_highlighted() {
    let lat = eye_level_lat();
    let mut registry = registry_of(&[
        ("A", lat, 0.0),
        ("B", lat, 0.0),
        ("C", lat, 180.0),
        ("D", -40.0, 60.0),
    ]);
    let tester = PointerHitTester::new();
    let cam = camera();
    for (x, y) in [(0.0, 0.0), (0.3, -0.2), (0.0, 0.0), (-0.9, 0.9)] {
        tester.resolve(
            &PointerState::new(x, y),
            &cam,
            Quat::IDENTITY,
            &mut registry,
            VIEWPORT,
        );
        let lit = registry.iter().filter(|m| m.is_highlighted()).count();
        assert!(lit <= 1);
        let dimmed = registry
            .iter()
            .filter(|m| m.current_opacity == m.base_opacity)
            .count();
        assert_eq!(lit + dimmed, registry.len());
    }
}

#[test]
fn empty_registry_never_hits() {
    let mut registry = MarkerRegistry::new();
    let result = PointerHitTester::new().resolve(
        &PointerState::default(),
        &camera(),
        Quat::IDENTITY,
        &mut registry,
        VIEWPORT,
    );
    assert_eq!(result, Default::default());
}

#[test]
fn hit_distance_lands_on_the_marker_box() {
    let registry = registry_of(&[("Front", eye_level_lat(), 0.0)]);
    let cam = camera();
    let (_, t) = PointerHitTester::new()
        .pick(&PointerState::default(), &cam, Quat::IDENTITY, &registry)
        .unwrap();
    let ray = cam.ray_from_ndc(Vec2::ZERO).unwrap();
    let marker = registry.get(0).unwrap();
    let local = marker
        .model_matrix(Quat::IDENTITY)
        .inverse()
        .transform_point3(ray.at(t));
    assert!(local.abs().max_element() <= 0.5 + 1e-3, "local = {local:?}");
    assert!(local.z > 0.49, "enters through the outer face, local = {local:?}");
}

#[test]
fn client_position_outside_the_canvas_never_hits() {
    assert!(!PointerState::from_client(-200.0, 300.0, VIEWPORT).is_valid());
    assert!(!PointerState::from_client(400.0, 601.0, VIEWPORT).is_valid());
    assert!(!PointerState::from_client(800.5, 0.0, VIEWPORT).is_valid());

    // Narrow portrait canvas: a marker on the left limb projects past the edge.
    let portrait = Viewport::new(200.0, 800.0);
    let cam = Camera::from_config(&CameraConfig::default(), portrait.aspect());
    let mut registry = registry_of(&[("Limb", eye_level_lat(), -90.0)]);
    let center = registry.get(0).unwrap().center();
    let ndc = cam.project_to_ndc(center);
    assert!(ndc.x < -1.0, "ndc = {ndc:?}");

    let tester = PointerHitTester::new();
    let off_screen = PointerState::new(ndc.x, ndc.y);
    assert!(tester
        .pick(&off_screen, &cam, Quat::IDENTITY, &registry)
        .is_some());

    let client = Vec2::new(
        (ndc.x + 1.0) * 0.5 * portrait.width,
        (1.0 - ndc.y) * 0.5 * portrait.height,
    );
    let pointer = PointerState::from_client(client.x, client.y, portrait);
    let result = tester.resolve(&pointer, &cam, Quat::IDENTITY, &mut registry, portrait);
    assert_eq!(result.hit, None);
    assert!(!result.tooltip_frame().visible);
    assert!(registry.iter().all(|m| !m.is_highlighted()));
}

#[test]
fn pitch_is_applied_after_yaw_when_picking() {
    // Equator marker at lng -90: yaw a quarter turn to face the camera, then
    // pitch up until its base sits on the centre ray.
    let registry = registry_of(&[("Side", 0.0, -90.0)]);
    let cam = camera();
    let tester = PointerHitTester::new();
    let lift = -(1.0 / GLOBE_RADIUS).asin();
    let centre = PointerState::default();

    let yaw_only = GroupRotation {
        pitch: 0.0,
        yaw: FRAC_PI_2,
    };
    assert!(tester.pick(&centre, &cam, yaw_only.quat(), &registry).is_none());

    let tilted = GroupRotation {
        pitch: lift,
        yaw: FRAC_PI_2,
    };
    let (i, t) = tester
        .pick(&centre, &cam, tilted.quat(), &registry)
        .unwrap();
    assert_eq!(i, 0);
    assert!(t > 9.5 && t < 10.5, "t = {t}");

    // Applying pitch first would leave the marker on the equator.
    let reversed = Quat::from_rotation_y(FRAC_PI_2) * Quat::from_rotation_x(lift);
    assert!(tester.pick(&centre, &cam, reversed, &registry).is_none());
}
