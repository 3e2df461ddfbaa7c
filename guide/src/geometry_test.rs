use super::*;

fn unit_box() -> Bounds {
    Bounds::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0))
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn padded_square_is_centered() {
    let b = Bounds::padded_square(720.0, 36.0);
    assert_eq!(b.min, Point::new(36.0, 36.0));
    assert_eq!(b.max, Point::new(684.0, 684.0));
    assert_eq!(b.center(), Point::new(360.0, 360.0));
    assert_eq!(b.radii(), (324.0, 324.0));
}

#[test]
fn padded_square_degenerate_when_padding_exceeds_half() {
    assert!(Bounds::padded_square(10.0, 6.0).is_degenerate());
    assert!(Bounds::padded_square(10.0, 5.0).is_degenerate());
    assert!(!Bounds::padded_square(10.0, 4.0).is_degenerate());
}

// =============================================================
// Ellipse containment
// =============================================================

#[test]
fn ellipse_contains_center_and_edge() {
    let b = unit_box();
    assert!(b.ellipse_contains(Point::new(50.0, 50.0)));
    assert!(b.ellipse_contains(Point::new(100.0, 50.0)));
    assert!(b.ellipse_contains(Point::new(50.0, 0.0)));
}

#[test]
fn ellipse_excludes_corners() {
    let b = unit_box();
    assert!(!b.ellipse_contains(Point::new(1.0, 1.0)));
    assert!(!b.ellipse_contains(Point::new(99.0, 99.0)));
}

#[test]
fn degenerate_ellipse_contains_nothing() {
    let b = Bounds::padded_square(10.0, 8.0);
    assert!(!b.ellipse_contains(b.center()));
}

// =============================================================
// Angles
// =============================================================

#[test]
fn angle_zero_is_three_oclock() {
    let b = unit_box();
    assert!((b.angle_deg(Point::new(90.0, 50.0)) - 0.0).abs() < 1e-9);
}

#[test]
fn angle_grows_clockwise_on_screen() {
    let b = unit_box();
    // Six o'clock is below the center, i.e. +y.
    assert!((b.angle_deg(Point::new(50.0, 90.0)) - 90.0).abs() < 1e-9);
    assert!((b.angle_deg(Point::new(10.0, 50.0)) - 180.0).abs() < 1e-9);
    assert!((b.angle_deg(Point::new(50.0, 10.0)) - 270.0).abs() < 1e-9);
}

// =============================================================
// Slice containment
// =============================================================

#[test]
fn slice_contains_point_inside_span() {
    let b = unit_box();
    // 45° is down-right.
    assert!(b.slice_contains(Point::new(70.0, 70.0), 0.0, 90.0));
    assert!(!b.slice_contains(Point::new(30.0, 70.0), 0.0, 90.0));
}

#[test]
fn slice_handles_negative_start() {
    let b = unit_box();
    // -5° wraps to 355°, so a point just above 3 o'clock is inside.
    let just_above = Point::new(90.0, 48.0);
    assert!(b.angle_deg(just_above) > 355.0);
    assert!(b.slice_contains(just_above, -5.0, 30.0));
    assert!(!b.slice_contains(just_above, 0.0, 30.0));
}

#[test]
fn slice_handles_end_past_full_turn() {
    let b = unit_box();
    // 330°..365° includes a point just below 3 o'clock.
    assert!(b.slice_contains(Point::new(90.0, 52.0), 330.0, 365.0));
}

#[test]
fn full_turn_slice_is_whole_ellipse() {
    let b = unit_box();
    assert!(b.slice_contains(Point::new(20.0, 50.0), -5.0, 360.0));
    assert!(!b.slice_contains(Point::new(1.0, 1.0), -5.0, 360.0));
}

#[test]
fn empty_slice_contains_nothing() {
    let b = unit_box();
    assert!(!b.slice_contains(Point::new(70.0, 70.0), 45.0, 45.0));
    assert!(!b.slice_contains(Point::new(70.0, 70.0), 90.0, 0.0));
}

#[test]
fn slice_excludes_points_outside_ellipse() {
    let b = unit_box();
    assert!(!b.slice_contains(Point::new(99.0, 99.0), 0.0, 90.0));
}

#[test]
fn pixel_center_offsets_by_half() {
    assert_eq!(Point::pixel_center(0, 3), Point::new(0.5, 3.5));
}
