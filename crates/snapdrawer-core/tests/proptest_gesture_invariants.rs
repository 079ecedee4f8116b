//! Property-based invariant tests for the drawer gesture pipeline.
//!
//! 1. Without hyperextension, offsets never leave the configured bounds
//! 2. Resistance is monotonic and strictly shrinks the overshoot below 1
//! 3. `state()` agrees with the committed offset, one variant at a time
//! 4. A flick in the opening direction settles at the bound
//! 5. A side lock keeps the pane off the locked side
//! 6. Arbitrary pointer/API sequences never panic and always end idle

use proptest::prelude::*;
use serde_json::json;
use snapdrawer_core::geometry::apply_resistance;
use snapdrawer_core::{
    Drawer, DrawerBuilder, MemorySurface, PaneState, PointerSample, PointerTarget, Side,
};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Down(f64, f64),
    Move(f64, f64),
    Up,
    Cancel,
    Open(Side),
    Close,
    Finish,
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0.0f64..1000.0, 0.0f64..1000.0).prop_map(|(x, y)| Op::Down(x, y)),
        4 => (0.0f64..1000.0, 0.0f64..1000.0).prop_map(|(x, y)| Op::Move(x, y)),
        1 => Just(Op::Up),
        1 => Just(Op::Cancel),
        1 => side_strategy().prop_map(Op::Open),
        1 => Just(Op::Close),
        1 => Just(Op::Finish),
    ]
}

fn bounds_strategy() -> impl Strategy<Value = (i32, i32)> {
    (-600i32..=0, 0i32..=600)
}

fn build(options: serde_json::Value) -> Drawer<MemorySurface> {
    DrawerBuilder::new()
        .element(MemorySurface::default())
        .options(options)
        .build()
        .expect("valid options")
}

fn apply(drawer: &mut Drawer<MemorySurface>, op: &Op) {
    match *op {
        Op::Down(x, y) => {
            drawer.pointer_down(PointerSample::new(x, y), PointerTarget::default());
        }
        Op::Move(x, y) => {
            drawer.pointer_move(PointerSample::new(x, y));
        }
        Op::Up => {
            drawer.pointer_up();
        }
        Op::Cancel => {
            drawer.pointer_cancel();
        }
        Op::Open(side) => drawer.open(side),
        Op::Close => drawer.close(),
        Op::Finish => drawer.transition_finished(),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Clamping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn offsets_stay_in_bounds_without_hyperextension(
        (min, max) in bounds_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut drawer = build(json!({
            "hyperextensible": false,
            "minPosition": min,
            "maxPosition": max,
        }));
        for op in &ops {
            apply(&mut drawer, op);
            let offset = drawer.offset();
            prop_assert!(
                (min..=max).contains(&offset),
                "offset {offset} outside [{min}, {max}] after {op:?}"
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Resistance
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn resistance_is_monotonic(
        a in -2000.0f64..2000.0,
        b in -2000.0f64..2000.0,
        resistance in 0.0f64..=1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let damped_lo = apply_resistance(lo, -266.0, 266.0, resistance);
        let damped_hi = apply_resistance(hi, -266.0, 266.0, resistance);
        prop_assert!(damped_lo <= damped_hi);
    }

    #[test]
    fn resistance_shrinks_overshoot(
        excess in 1.0f64..2000.0,
        resistance in 0.0f64..0.99,
    ) {
        let damped = apply_resistance(266.0 + excess, -266.0, 266.0, resistance);
        prop_assert!(damped - 266.0 < excess);
        let damped = apply_resistance(-266.0 - excess, -266.0, 266.0, resistance);
        prop_assert!(-266.0 - damped < excess);
    }

    #[test]
    fn resistance_leaves_in_bounds_values_alone(
        candidate in -266.0f64..=266.0,
        resistance in 0.0f64..=1.0,
    ) {
        prop_assert_eq!(apply_resistance(candidate, -266.0, 266.0, resistance), candidate);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. state() agrees with the offset
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn state_matches_offset(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut drawer = build(json!({}));
        for op in &ops {
            apply(&mut drawer, op);
            let offset = drawer.offset();
            let expected = if offset == 266 {
                PaneState::Left
            } else if offset == -266 {
                PaneState::Right
            } else {
                PaneState::Closed
            };
            prop_assert_eq!(drawer.state().state, expected);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Flicks settle at the bound
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn flick_towards_opening_settles_at_bound(
        start in 300.0f64..700.0,
        travel in 51.0f64..250.0,
        side in side_strategy(),
    ) {
        let mut drawer = build(json!({}));
        let dx = match side {
            Side::Left => travel,
            Side::Right => -travel,
        };
        drawer.pointer_down(PointerSample::new(start, 400.0), PointerTarget::default());
        drawer.pointer_move(PointerSample::new(start + dx, 400.0));
        drawer.pointer_up();
        drawer.transition_finished();

        let expected = match side {
            Side::Left => PaneState::Left,
            Side::Right => PaneState::Right,
        };
        prop_assert_eq!(drawer.state().state, expected);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Side lock
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn left_lock_never_reveals_left_panel(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut drawer = build(json!({ "disable": "left" }));
        for op in &ops {
            apply(&mut drawer, op);
            prop_assert!(drawer.offset() <= 0, "offset {} after {op:?}", drawer.offset());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Arbitrary sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_sequences_end_idle(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut drawer = build(json!({}));
        for op in &ops {
            apply(&mut drawer, op);
        }
        drawer.pointer_cancel();
        drawer.transition_finished();
        prop_assert!(!drawer.is_dragging());
        prop_assert!(!drawer.is_animating());
    }
}
