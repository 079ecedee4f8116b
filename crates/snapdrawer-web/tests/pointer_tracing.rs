//! Structured log output of the pointer adapter.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use snapdrawer_core::{DrawerBuilder, MemorySurface, PointerSample, PointerTarget};
use snapdrawer_web::pointer::{PointerAdapter, PointerIgnoredReason, PointerLogOutcome};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut message = String::new();
        let fields = visitor
            .0
            .into_iter()
            .filter(|(name, value)| {
                if name == "message" {
                    message.clone_from(value);
                    false
                } else {
                    true
                }
            })
            .collect();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_tracing(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn adapter() -> PointerAdapter<MemorySurface> {
    let drawer = DrawerBuilder::new()
        .element(MemorySurface::default())
        .build()
        .expect("default drawer");
    PointerAdapter::new(drawer)
}

fn field<'a>(event: &'a CapturedEvent, name: &str) -> Option<&'a str> {
    event
        .fields
        .iter()
        .find(|(field, _)| field == name)
        .map(|(_, value)| value.as_str())
}

#[test]
fn forwarded_signals_carry_sequence_numbers() {
    let events = with_captured_tracing(|| {
        let mut adapter = adapter();
        adapter.pointer_down(5, PointerSample::new(300.0, 200.0), PointerTarget::default());
        adapter.pointer_move(5, PointerSample::new(340.0, 201.0));
        adapter.pointer_up(5);
    });

    let sequences: Vec<&str> = events
        .iter()
        .filter(|event| event.message == "pointer signal forwarded")
        .filter_map(|event| field(event, "sequence"))
        .collect();
    assert_eq!(sequences, vec!["1", "2", "3"]);
}

#[test]
fn foreign_pointer_is_logged_as_ignored() {
    let mut outcome = None;
    let events = with_captured_tracing(|| {
        let mut adapter = adapter();
        adapter.pointer_down(5, PointerSample::new(300.0, 200.0), PointerTarget::default());
        outcome = Some(adapter.pointer_move(9, PointerSample::new(320.0, 200.0)).log.outcome);
    });

    assert_eq!(
        outcome,
        Some(PointerLogOutcome::Ignored(PointerIgnoredReason::PointerMismatch))
    );
    let ignored = events
        .iter()
        .find(|event| event.message == "pointer signal ignored")
        .expect("ignored signal is traced");
    assert_eq!(ignored.level, tracing::Level::TRACE);
    assert_eq!(field(ignored, "reason"), Some("PointerMismatch"));
}

#[test]
fn blur_mid_gesture_is_logged_at_debug() {
    let events = with_captured_tracing(|| {
        let mut adapter = adapter();
        adapter.pointer_down(2, PointerSample::new(300.0, 200.0), PointerTarget::default());
        adapter.pointer_move(2, PointerSample::new(360.0, 200.0));
        adapter.blur();
        assert!(!adapter.drawer().is_dragging());
    });

    assert!(events.iter().any(|event| {
        event.level == tracing::Level::DEBUG && event.message == "active pointer interrupted"
    }));
}
