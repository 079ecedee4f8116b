#![no_main]

use libfuzzer_sys::fuzz_target;
use snapdrawer_core::Settings;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    // Rejected patches must leave the settings untouched.
    let mut settings = Settings::default();
    let before = settings.clone();
    match settings.merge(&value) {
        Ok(()) => assert!(settings.validate().is_ok()),
        Err(_) => assert_eq!(settings, before),
    }

    if let Ok(parsed) = Settings::from_json(&value) {
        assert!(parsed.validate().is_ok());
    }
});
