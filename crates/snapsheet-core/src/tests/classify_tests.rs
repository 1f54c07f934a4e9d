use crate::classify::{resolve_intent, GestureIntent, GestureKind};
use crate::viewport::ScrollMetrics;

fn scrollable_mid() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 250.0,
        max_scroll: 600.0,
        has_overflow: true,
        at_top: false,
        at_bottom: false,
    }
}

fn scrollable_at_top() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 0.0,
        max_scroll: 600.0,
        has_overflow: true,
        at_top: true,
        at_bottom: false,
    }
}

fn scrollable_at_bottom() -> ScrollMetrics {
    ScrollMetrics {
        scroll_top: 600.0,
        max_scroll: 600.0,
        has_overflow: true,
        at_top: false,
        at_bottom: true,
    }
}

#[test]
fn below_expanded_every_drag_is_sheet() {
    for metrics in [scrollable_mid(), scrollable_at_top(), ScrollMetrics::no_overflow()] {
        let intent = resolve_intent(5.0, 5.0, 0.1, GestureKind::Touch, false, metrics, false);
        assert_eq!(intent, GestureIntent::Sheet);
        let intent = resolve_intent(-5.0, -5.0, 0.1, GestureKind::Touch, false, metrics, false);
        assert_eq!(intent, GestureIntent::Sheet);
    }
}

#[test]
fn non_scrollable_ignores_casual_gestures() {
    let metrics = ScrollMetrics::no_overflow();
    // Small pull.
    let intent = resolve_intent(5.0, 10.0, 2.0, GestureKind::Touch, true, metrics, false);
    assert_eq!(intent, GestureIntent::Ignore);
    // Long but slow pull.
    let intent = resolve_intent(5.0, 60.0, 0.3, GestureKind::Touch, true, metrics, false);
    assert_eq!(intent, GestureIntent::Ignore);
    // Upward pull never collapses.
    let intent = resolve_intent(-10.0, -60.0, 2.0, GestureKind::Touch, true, metrics, false);
    assert_eq!(intent, GestureIntent::Ignore);
}

#[test]
fn non_scrollable_deliberate_pull_takes_sheet() {
    let metrics = ScrollMetrics::no_overflow();
    let intent = resolve_intent(8.0, 45.0, 2.0, GestureKind::Touch, true, metrics, false);
    assert_eq!(intent, GestureIntent::Sheet);
    // A wheel tick of the same size qualifies without the velocity gate.
    let intent = resolve_intent(45.0, 45.0, 0.0, GestureKind::Wheel, true, metrics, false);
    assert_eq!(intent, GestureIntent::Sheet);
}

#[test]
fn mid_scroll_content_always_wins() {
    let metrics = scrollable_mid();
    for delta in [-30.0, -5.0, 5.0, 30.0] {
        let intent = resolve_intent(delta, delta, 3.0, GestureKind::Touch, true, metrics, false);
        assert_eq!(intent, GestureIntent::Content, "delta {delta} must stay with content");
    }
}

#[test]
fn downward_pull_at_top_arms() {
    let intent = resolve_intent(6.0, 6.0, 0.5, GestureKind::Touch, true, scrollable_at_top(), false);
    assert_eq!(intent, GestureIntent::ArmTop);
}

#[test]
fn upward_pull_at_top_stays_with_content() {
    let intent =
        resolve_intent(-6.0, -6.0, 0.5, GestureKind::Touch, true, scrollable_at_top(), false);
    assert_eq!(intent, GestureIntent::Content);
}

#[test]
fn upward_pull_at_bottom_is_conservative_for_touch() {
    let intent =
        resolve_intent(-6.0, -6.0, 0.5, GestureKind::Touch, true, scrollable_at_bottom(), false);
    assert_eq!(intent, GestureIntent::Content);
    // Even with the lock armed, touch never flips at the bottom edge.
    let intent =
        resolve_intent(-6.0, -6.0, 0.5, GestureKind::Touch, true, scrollable_at_bottom(), true);
    assert_eq!(intent, GestureIntent::Content);
}

#[test]
fn wheel_at_bottom_needs_prior_arming() {
    let intent =
        resolve_intent(-20.0, -20.0, 0.0, GestureKind::Wheel, true, scrollable_at_bottom(), false);
    assert_eq!(intent, GestureIntent::Content);
    let intent =
        resolve_intent(-20.0, -20.0, 0.0, GestureKind::Wheel, true, scrollable_at_bottom(), true);
    assert_eq!(intent, GestureIntent::ArmBottom);
}
