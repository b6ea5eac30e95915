#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Config and settings TOML must be rejected gracefully, never panic.
    if let Ok(cfg) = biofilm_config::load_toml(data) {
        let _ = cfg.validate();
    }
    if let Ok(s) = toml::from_str::<biofilm_config::PersistedSettings>(data) {
        let _ = s.validate();
    }
    let _ = biofilm_config::parse_offset(data);
    let _ = biofilm_config::parse_volume(data);
});
