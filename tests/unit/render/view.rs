use super::*;
use crate::render::stub::StubBackend;

fn approx(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

fn viewport() -> Viewport {
    Viewport::new(200, 100).unwrap()
}

#[test]
fn reset_restores_identity_but_keeps_flips() {
    let mut view = ViewState {
        zoom: 2.5,
        pan: Vec2::new(40.0, -10.0),
        rotation: 33.0,
        flip_x: true,
        ..ViewState::default()
    };
    view.reset();
    assert_eq!(view.zoom, 1.0);
    assert_eq!(view.pan, Vec2::ZERO);
    assert_eq!(view.rotation, 0.0);
    assert!(view.flip_x);
    assert!(!view.flip_y);
}

#[test]
fn wheel_zooms_out_on_positive_delta_and_clamps() {
    let mut view = ViewState::default();
    view.wheel(500.0);
    assert!((view.zoom - 0.5).abs() < 1e-12);
    view.wheel(500.0);
    assert_eq!(view.zoom, ZOOM_MIN);
    view.wheel(-100_000.0);
    assert_eq!(view.zoom, ZOOM_MAX);
}

#[test]
fn setters_clamp_and_ignore_non_finite() {
    let mut view = ViewState::default();
    view.set_zoom(10.0);
    assert_eq!(view.zoom, ZOOM_MAX);
    view.set_zoom(f64::NAN);
    assert_eq!(view.zoom, ZOOM_MAX);
    view.set_rotation(-270.0);
    assert_eq!(view.rotation, -ROTATION_LIMIT);
}

#[test]
fn pan_accumulates_only_while_dragging() {
    let mut view = ViewState::default();
    view.pointer_move(Point::new(50.0, 50.0));
    assert_eq!(view.pan, Vec2::ZERO);

    view.pointer_down(Point::new(10.0, 10.0));
    view.pointer_move(Point::new(15.0, 12.0));
    view.pointer_move(Point::new(20.0, 20.0));
    assert!(view.is_dragging());
    view.pointer_up();
    view.pointer_move(Point::new(90.0, 90.0));
    assert_eq!(view.pan, Vec2::new(10.0, 10.0));
}

#[test]
fn identity_view_centers_raster() {
    let t = compose(100, 50, &ViewState::default(), viewport());
    assert!(approx(t * Point::ORIGIN, Point::new(50.0, 25.0)));
    assert!(approx(t * Point::new(100.0, 50.0), Point::new(150.0, 75.0)));
}

#[test]
fn flip_x_mirrors_around_the_viewport_center() {
    let view = ViewState {
        flip_x: true,
        ..ViewState::default()
    };
    let t = compose(100, 50, &view, viewport());
    assert!(approx(t * Point::ORIGIN, Point::new(150.0, 25.0)));
}

#[test]
fn pan_is_in_viewport_pixels_regardless_of_zoom() {
    let view = ViewState {
        zoom: 2.0,
        pan: Vec2::new(10.0, 0.0),
        ..ViewState::default()
    };
    let t = compose(100, 50, &view, viewport());
    assert!(approx(t * Point::ORIGIN, Point::new(10.0, 0.0)));
}

#[test]
fn rotation_turns_about_the_raster_center() {
    let view = ViewState {
        rotation: 90.0,
        ..ViewState::default()
    };
    let t = compose(100, 50, &view, viewport());
    assert!(approx(t * Point::new(50.0, 25.0), Point::new(100.0, 50.0)));
    // The raster's right-middle edge rotates onto the bottom of the center.
    assert!(approx(t * Point::new(100.0, 25.0), Point::new(100.0, 100.0)));
}

#[test]
fn inverse_mapping_round_trips() {
    let view = ViewState {
        zoom: 1.7,
        rotation: -35.0,
        flip_y: true,
        pan: Vec2::new(-12.0, 8.0),
        ..ViewState::default()
    };
    let vp = viewport();
    let t = compose(80, 60, &view, vp);
    let raster_pt = Point::new(13.0, 41.0);
    let back = viewport_to_raster(t * raster_pt, 80, 60, &view, vp).unwrap();
    assert!(approx(back, raster_pt));
}

#[test]
fn present_forwards_composed_transform_to_backend() {
    let mut backend = StubBackend::default();
    let raster = RenderedRaster::filled(100, 50, Color::WHITE);
    let frame = present(&raster, &ViewState::default(), viewport(), Color::BLACK, &mut backend)
        .unwrap();
    assert_eq!((frame.width, frame.height), (200, 100));
    assert_eq!(backend.presents, 1);
    let t = backend.last_transform.unwrap();
    assert!(approx(t * Point::ORIGIN, Point::new(50.0, 25.0)));
}
