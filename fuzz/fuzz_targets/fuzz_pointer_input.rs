#![no_main]

use libfuzzer_sys::fuzz_target;
use snapdrawer_core::{DrawerBuilder, MemorySurface};
use snapdrawer_web::input::parse_pointer_input;
use snapdrawer_web::pointer::PointerAdapter;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(drawer) = DrawerBuilder::new().element(MemorySurface::default()).build() else {
        return;
    };
    let mut adapter = PointerAdapter::new(drawer);

    // One record per line; malformed lines must fail cleanly.
    for line in text.lines() {
        if let Ok(input) = parse_pointer_input(line) {
            let dispatch = input.apply(&mut adapter);
            assert!(dispatch.log.sequence.is_some() || !dispatch.is_forwarded());
        }
    }

    adapter.blur();
    adapter.drawer_mut().transition_finished();
    assert!(!adapter.drawer().is_dragging());
    assert!(!adapter.drawer().is_animating());
});
