use biofilm_core::feed::parse_feed;
use biofilm_core::{CalibrationOffsets, EngineCfg, RawReading, SensorReading, evaluate, normalize};
use chrono::{DateTime, TimeDelta, Utc};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

// Synthetic telemetry: slow drift plus xorshift noise, one record every 15 s
fn synth_readings(n: usize, seed: u32) -> Vec<SensorReading> {
    let mut state = seed.max(1);
    let mut next = || {
        let mut x = state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    };
    let offsets = CalibrationOffsets::default();
    (0..n)
        .map(|i| {
            let t = i as f64 / 100.0;
            let mut r = RawReading::empty(
                DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(15 * i as i64),
            );
            r.ph = Some(7.0 + t.sin() + (next() - 0.5) * 0.2);
            r.temperature = Some(25.0 + 8.0 * t.cos());
            r.flow = Some(60.0 + 50.0 * next());
            r.turbidity = Some(8.0 * next());
            r.tds = Some(250.0 + 400.0 * next());
            // every third record carries an upstream score
            r.external_risk = (i % 3 == 0).then(|| 100.0 * next());
            normalize(&r, &offsets)
        })
        .collect()
}

fn synth_feed(n: usize) -> String {
    let records: Vec<String> = (0..n)
        .map(|i| {
            let ts = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(15 * i as i64);
            format!(
                r#"{{"created_at":"{}","entry_id":{i},"field1":"7.1","field2":"26.5","field3":"48","field4":"72","field5":"1.8","field6":"320","field7":null,"field8":"1"}}"#,
                ts.to_rfc3339()
            )
        })
        .collect();
    format!(r#"{{"channel":{{"id":1}},"feeds":[{}]}}"#, records.join(","))
}

fn configure(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    // Allow quick tweaking without CLI flags (Criterion 0.5):
    //   BENCH_SAMPLE_SIZE=10 BENCH_MEAS_MS=50 cargo bench -p biofilm_core --bench pipeline
    if let Ok(ss) = std::env::var("BENCH_SAMPLE_SIZE")
        && let Ok(n) = ss.parse::<usize>()
    {
        g.sample_size(n.max(10));
    } else {
        g.sample_size(50);
    }
    if let Ok(ms) = std::env::var("BENCH_MEAS_MS")
        && let Ok(ms_u64) = ms.parse::<u64>()
    {
        g.measurement_time(std::time::Duration::from_millis(ms_u64));
    }
}

pub fn bench_evaluate(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate");
    configure(&mut g);

    let readings = synth_readings(10_000, 0xB10F11);
    let engine = EngineCfg::default();
    g.bench_function("pairwise_10k", |b| {
        b.iter(|| {
            for pair in readings.windows(2) {
                let ev = evaluate(black_box(&pair[1]), Some(&pair[0]), &engine, 1000);
                black_box(ev);
            }
        })
    });
    g.finish();
}

pub fn bench_parse_feed(c: &mut Criterion) {
    let mut g = c.benchmark_group("parse_feed");
    configure(&mut g);

    for &n in &[10usize, 100, 8000] {
        let body = synth_feed(n);
        g.bench_function(format!("records_{n}"), |b| {
            b.iter_batched(
                || body.clone(),
                |s| {
                    let batch = parse_feed(black_box(&s));
                    black_box(batch.map(|v| v.len()).unwrap_or(0));
                },
                BatchSize::SmallInput,
            )
        });
    }
    g.finish();
}

criterion_group!(pipeline, bench_evaluate, bench_parse_feed);
criterion_main!(pipeline);
