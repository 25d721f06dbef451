//! Criterion benchmarks for command parsing and swipe planning.
//!
//! Every received line goes through `parse_line` plus one argument parser, and
//! every swipe is planned before its first event is injected, so both sit on
//! the per-command latency path.
//!
//! Run with:
//! ```bash
//! cargo bench --package touchbridge-core --bench command_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use touchbridge_core::keymap::{decompose, VirtualKeyboard};
use touchbridge_core::protocol::args::{SwipeArgs, TapArgs};
use touchbridge_core::protocol::payload::decode_text;
use touchbridge_core::{parse_line, SwipePlan};

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for line in ["PING", "TAP 540 960 0.8 1", "SWIPE 100 1500 100 300 250"] {
        group.bench_with_input(BenchmarkId::new("parse_line", line), line, |b, line| {
            b.iter(|| parse_line(black_box(line)))
        });
    }

    group.bench_function("tap_args", |b| {
        b.iter(|| TapArgs::parse(black_box("540 960 0.8 1")))
    });
    group.bench_function("swipe_args", |b| {
        b.iter(|| SwipeArgs::parse(black_box("100 1500 100 300 250")))
    });
    group.bench_function("decode_text_1k", |b| {
        let payload = touchbridge_core::protocol::payload::encode_text(&"lorem ipsum ".repeat(85));
        b.iter(|| decode_text(black_box(&payload)))
    });

    group.finish();
}

fn bench_swipe_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("swipe_plan");

    for duration in [0, 160, 1000, 5000] {
        group.bench_with_input(BenchmarkId::from_parameter(duration), &duration, |b, &d| {
            b.iter(|| {
                let plan = SwipePlan::new((100, 1500), (100, 300), black_box(d));
                plan.moves().map(|s| s.x + s.y).sum::<i32>()
            })
        });
    }

    group.finish();
}

fn bench_text_resolution(c: &mut Criterion) {
    let kb = VirtualKeyboard::new();
    let text: Vec<char> = "Héllo wörld, ça va? ".chars().collect();

    c.bench_function("resolve_text", |b| {
        b.iter(|| {
            black_box(&text)
                .iter()
                .filter_map(|&ch| match decompose(ch) {
                    Some(pair) => kb.events_for(&pair),
                    None => kb.events_for(&[ch]),
                })
                .map(|events| events.len())
                .sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_parse, bench_swipe_plan, bench_text_resolution);
criterion_main!(benches);
