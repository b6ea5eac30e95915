//! Human-readable error descriptions and structured JSON error formatting.

use biofilm_core::error::{BuildError, MonitorError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSource => {
                "What happened: No telemetry source was provided to the monitor.\nLikely causes: The feed client failed to initialize.\nHow to fix: Check [feed] url in the config or pass --feed-file.".to_string()
            }
            BuildError::MissingSettings => {
                "What happened: No settings store was provided to the monitor.\nLikely causes: The settings file location could not be resolved.\nHow to fix: Set [settings] path in the config.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/biofilm.toml for a sample."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MonitorError>() {
        return match me {
            MonitorError::Config(msg) => format!(
                "What happened: The configuration could not be used ({msg}).\nLikely causes: Missing [feed] section, a typo in a key, or an out-of-range value.\nHow to fix: Edit the config file (default etc/biofilm.toml) and run `health` to check it."
            ),
            MonitorError::Settings(msg) => format!(
                "What happened: Settings were rejected or could not be read ({msg}).\nLikely causes: Non-numeric input, or a hand-edited settings file with invalid values.\nHow to fix: Pass plain numbers (e.g. --ph -0.1), or delete the settings file to start from defaults."
            ),
            MonitorError::Feed(msg) => format!(
                "What happened: Telemetry could not be fetched or parsed ({msg}).\nLikely causes: Network outage, wrong channel URL or read key, or a non-JSON response.\nHow to fix: Check [feed] url and api_key, or try again with --feed-file."
            ),
            MonitorError::Export(msg) | MonitorError::Io(msg) => format!(
                "What happened: Writing output failed ({msg}).\nLikely causes: Missing directory or insufficient permissions.\nHow to fix: Choose a writable --output path."
            ),
        };
    }

    // Settings file problems surface from the config crate as plain reports
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("settings") {
        return format!(
            "What happened: {msg}.\nLikely causes: The settings file is corrupt or was edited by hand.\nHow to fix: Fix or delete the file; defaults are used when it is missing."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class; anything untyped returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    match err.downcast_ref::<MonitorError>() {
        Some(MonitorError::Config(_)) => 3,
        Some(MonitorError::Settings(_)) => 4,
        Some(MonitorError::Feed(_)) => 5,
        Some(MonitorError::Export(_) | MonitorError::Io(_)) => 6,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<MonitorError>() {
        Some(MonitorError::Config(_)) => "Config",
        Some(MonitorError::Settings(_)) => "Settings",
        Some(MonitorError::Feed(_)) => "Feed",
        Some(MonitorError::Export(_)) => "Export",
        Some(MonitorError::Io(_)) => "Io",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_codes() {
        let e = eyre::Report::new(MonitorError::Config("feed.url".into()));
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("feed.url"));

        let e = eyre::Report::new(MonitorError::Feed("HTTP 404".into())).wrap_err("export");
        assert_eq!(exit_code_for_error(&e), 5);

        let e = eyre::eyre!("boom");
        assert_eq!(exit_code_for_error(&e), 1);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Error");
    }

    #[test]
    fn every_monitor_error_has_a_reason_and_code() {
        let cases = [
            (MonitorError::Feed("x".into()), "Feed", 5),
            (MonitorError::Settings("x".into()), "Settings", 4),
            (MonitorError::Config("x".into()), "Config", 3),
            (MonitorError::Export("x".into()), "Export", 6),
            (MonitorError::Io("x".into()), "Io", 6),
        ];
        for (err, reason, code) in cases {
            let e = eyre::Report::new(err);
            assert_eq!(reason_name(&e), reason);
            assert_eq!(exit_code_for_error(&e), code);
            assert!(humanize(&e).starts_with("What happened:"));
        }
    }
}
