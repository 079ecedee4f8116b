#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use snapdrawer_core::{DrawerBuilder, MemorySurface, PointerSample, PointerTarget};
use snapdrawer_web::input::parse_pointer_input;
use snapdrawer_web::pointer::PointerAdapter;
use std::hint::black_box;

fn adapter() -> PointerAdapter<MemorySurface> {
    let drawer = DrawerBuilder::new()
        .element(MemorySurface::default())
        .build()
        .expect("default drawer should build");
    PointerAdapter::new(drawer)
}

fn pos(x: f64, y: f64) -> PointerSample {
    PointerSample::new(x, y)
}

fn bench_pointer_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawer/web_pointer/lifecycle");

    group.bench_function("down_move_32_up", |b| {
        b.iter(|| {
            let mut adapter = adapter();
            let down = adapter.pointer_down(7, pos(400.0, 300.0), PointerTarget::default());
            black_box(down.log.sequence);
            for step in 0..32 {
                let dispatch = adapter.pointer_move(7, pos(400.0 + f64::from(step) * 6.0, 301.0));
                black_box(dispatch.response.prevent_default);
            }
            let up = adapter.pointer_up(7);
            black_box(up.log.outcome);
            adapter.drawer_mut().transition_finished();
            black_box(adapter.drawer().offset());
        });
    });

    group.bench_function("down_move_120_cancel", |b| {
        b.iter(|| {
            let mut adapter = adapter();
            adapter.pointer_down(3, pos(600.0, 300.0), PointerTarget::default());
            for step in 0..120 {
                let x = 600.0 - f64::from(step) * 3.0;
                black_box(adapter.pointer_move(3, pos(x, 300.0)).log.sequence);
            }
            black_box(adapter.pointer_cancel(Some(3)).log.phase);
        });
    });

    group.bench_function("foreign_pointer_noise_64", |b| {
        b.iter(|| {
            let mut adapter = adapter();
            adapter.pointer_down(1, pos(200.0, 200.0), PointerTarget::default());
            for id in 2..66 {
                black_box(adapter.pointer_move(id, pos(210.0, 200.0)).log.outcome);
            }
            black_box(adapter.pointer_up(1).log.sequence);
        });
    });

    group.finish();
}

fn bench_input_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawer/web_pointer/input_parse");
    let mouse = r#"{"kind":"move","pointerId":1,"pageX":120.5,"pageY":40}"#;
    let touch = r#"{"kind":"down","touches":[{"pageX":12,"pageY":30},{"pageX":90,"pageY":31}],"ignore":false}"#;

    group.bench_function("mouse_move", |b| {
        b.iter(|| black_box(parse_pointer_input(black_box(mouse))));
    });
    group.bench_function("touch_down", |b| {
        b.iter(|| black_box(parse_pointer_input(black_box(touch))));
    });

    group.finish();
}

criterion_group!(benches, bench_pointer_lifecycle, bench_input_parse);
criterion_main!(benches);
