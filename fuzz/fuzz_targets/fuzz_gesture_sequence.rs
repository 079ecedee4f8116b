#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::json;
use snapdrawer_core::{DrawerBuilder, MemorySurface, PointerSample, PointerTarget, Side};
use snapdrawer_web::pointer::PointerAdapter;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { id: u8, x: i16, y: i16, ignore: bool },
    Move { id: u8, x: i16, y: i16 },
    Up { id: u8 },
    Cancel { id: Option<u8> },
    Leave { id: u8 },
    Blur,
    Open { left: bool },
    Close,
    Expand { left: bool },
    Toggle { enable: bool },
    Finish,
}

#[derive(Debug, Arbitrary)]
struct Input {
    max: u16,
    min: u16,
    hyperextensible: bool,
    lock: u8,
    ops: Vec<Op>,
}

fn side(left: bool) -> Side {
    if left { Side::Left } else { Side::Right }
}

fn sample(x: i16, y: i16) -> PointerSample {
    PointerSample::new(f64::from(x), f64::from(y))
}

fuzz_target!(|input: Input| {
    let max = i32::from(input.max % 2000);
    let min = -i32::from(input.min % 2000);
    let lock = ["none", "left", "right"][usize::from(input.lock % 3)];
    let options = json!({
        "maxPosition": max,
        "minPosition": min,
        "hyperextensible": input.hyperextensible,
        "disable": lock,
    });
    let Ok(drawer) = DrawerBuilder::new()
        .element(MemorySurface::new(1024))
        .options(options)
        .build()
    else {
        return;
    };
    let mut adapter = PointerAdapter::new(drawer);

    for op in input.ops.iter().take(512) {
        match *op {
            Op::Down { id, x, y, ignore } => {
                let target = PointerTarget {
                    in_ignore_region: ignore,
                    in_drag_handle: false,
                };
                adapter.pointer_down(u32::from(id), sample(x, y), target);
            }
            Op::Move { id, x, y } => {
                adapter.pointer_move(u32::from(id), sample(x, y));
            }
            Op::Up { id } => {
                adapter.pointer_up(u32::from(id));
            }
            Op::Cancel { id } => {
                adapter.pointer_cancel(id.map(u32::from));
            }
            Op::Leave { id } => {
                adapter.pointer_leave(u32::from(id));
            }
            Op::Blur => {
                adapter.blur();
            }
            Op::Open { left } => adapter.drawer_mut().open(side(left)),
            Op::Close => adapter.drawer_mut().close(),
            Op::Expand { left } => adapter.drawer_mut().expand(side(left)),
            Op::Toggle { enable: true } => adapter.drawer_mut().enable(),
            Op::Toggle { enable: false } => adapter.drawer_mut().disable(),
            Op::Finish => adapter.drawer_mut().transition_finished(),
        }

        let offset = adapter.drawer().offset();
        match lock {
            "left" => assert!(offset <= 0, "left lock revealed left panel: {offset}"),
            "right" => assert!(offset >= 0, "right lock revealed right panel: {offset}"),
            _ => {}
        }
    }

    adapter.blur();
    adapter.drawer_mut().transition_finished();
    assert!(!adapter.drawer().is_dragging());
    assert!(!adapter.drawer().is_animating());
});
