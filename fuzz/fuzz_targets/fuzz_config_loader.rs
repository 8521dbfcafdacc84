#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine, panics are not
    if let Ok(cfg) = ride_config::load_toml(data) {
        if cfg.validate().is_ok() {
            let params = ride_core::FusionParams::from(&cfg);
            assert!(params.validate().is_ok(), "validated config rejected by core: {params:?}");
        }
    }
});
