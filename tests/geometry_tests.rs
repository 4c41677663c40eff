use element_grounding::geometry::rect::Rect;

// =========================================================================
// Intersection over union
// =========================================================================

#[test]
fn iou_of_disjoint_rects_is_zero() {
    let a = Rect::from_ltwh(0.0, 0.0, 50.0, 50.0);
    let b = Rect::from_ltwh(100.0, 100.0, 50.0, 50.0);
    assert_eq!(a.iou(&b), 0.0);
    assert_eq!(b.iou(&a), 0.0);
}

#[test]
fn iou_of_rect_with_itself_is_one() {
    let a = Rect::from_ltwh(12.0, 30.0, 80.0, 24.0);
    assert!((a.iou(&a) - 1.0).abs() < 1e-12);
}

#[test]
fn iou_of_half_shifted_squares() {
    // Overlap 50x100 = 5000, union 15000
    let a = Rect::from_ltwh(0.0, 0.0, 100.0, 100.0);
    let b = Rect::from_ltwh(50.0, 0.0, 100.0, 100.0);
    assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-9);
}

#[test]
fn iou_with_degenerate_rect_is_zero() {
    let a = Rect::from_ltwh(0.0, 0.0, 100.0, 100.0);
    let line = Rect::from_ltwh(10.0, 10.0, 0.0, 50.0);
    assert_eq!(a.iou(&line), 0.0);
}

// =========================================================================
// Containment and visibility
// =========================================================================

#[test]
fn containment_includes_shared_edges() {
    let outer = Rect::from_ltwh(0.0, 0.0, 300.0, 600.0);
    let inner = Rect::from_ltwh(0.0, 0.0, 300.0, 50.0);
    assert!(inner.is_contained_in(&outer));
    assert!(!outer.is_contained_in(&inner));
    assert!(outer.is_contained_in(&outer));
}

#[test]
fn visible_fraction_against_viewport() {
    let viewport = Rect::from_ltwh(0.0, 0.0, 1000.0, 800.0);

    let inside = Rect::from_ltwh(10.0, 10.0, 100.0, 100.0);
    assert_eq!(inside.visible_fraction(&viewport), 1.0);

    let fifth = Rect::from_ltwh(-80.0, 100.0, 100.0, 100.0);
    assert!((fifth.visible_fraction(&viewport) - 0.2).abs() < 1e-9);

    let gone = Rect::from_ltwh(0.0, 900.0, 100.0, 100.0);
    assert_eq!(gone.visible_fraction(&viewport), 0.0);
}

#[test]
fn translate_and_center() {
    let r = Rect::from_ltwh(10.0, 20.0, 100.0, 30.0).translate(200.0, 100.0);
    assert_eq!(r, Rect::from_edges(210.0, 120.0, 310.0, 150.0));
    assert_eq!(r.center(), (260.0, 135.0));
}

#[test]
fn intersection_area_is_symmetric() {
    let a = Rect::from_ltwh(0.0, 0.0, 100.0, 60.0);
    let b = Rect::from_ltwh(40.0, 20.0, 100.0, 100.0);
    assert_eq!(a.intersection_area(&b), 60.0 * 40.0);
    assert_eq!(b.intersection_area(&a), 60.0 * 40.0);
}
