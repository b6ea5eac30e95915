#![no_main]
use biofilm_core::{CalibrationOffsets, EngineCfg, HistoryWindow, evaluate, normalize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Whatever the store serves, parsing and the full evaluation must not panic
    // and the resolved score must stay in range.
    let Ok(batch) = biofilm_core::feed::parse_feed(data) else {
        return;
    };
    let offsets = CalibrationOffsets { ph: 0.3, temperature: -1.0, tds: 12.0 };
    let mut window = HistoryWindow::default();
    for raw in &batch {
        window.append(normalize(raw, &offsets));
    }
    if let Some(current) = window.latest() {
        let ev = evaluate(current, window.previous(), &EngineCfg::default(), 1000);
        assert!((0.0..=100.0).contains(&ev.risk.score));
    }
});
