//! Benchmark – `replbuf::Buffer::append`
#![allow(missing_docs)]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use replbuf::Buffer;

/// A function declaration `lines` lines long whose body is a single
/// composite literal, so the unit only becomes ready on its last line.
fn make_unit(lines: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(lines + 2);
    out.push("func F() []string {\n".to_string());
    out.push("\treturn []string{\n".to_string());
    for i in 0..lines {
        out.push(format!("\t\t\"line {i}\", `raw {i}`,\n"));
    }
    out.push("\t}\n".to_string());
    out.push("}\n".to_string());
    out
}

/// Appends every line and returns the length of the ready unit.
fn run_lines(lines: &[String]) -> usize {
    let mut buf = Buffer::new();
    for line in lines {
        buf.append(line).expect("unit is well formed");
    }
    assert!(buf.is_ready());
    buf.as_str().len()
}

fn run_single(src: &str) -> usize {
    let mut buf = Buffer::new();
    buf.append(src).expect("unit is well formed");
    buf.as_str().len()
}

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("append");

    for &lines in &[10usize, 100, 1_000] {
        let unit = make_unit(lines);
        let joined = unit.concat();

        group.bench_with_input(BenchmarkId::new("line_by_line", lines), &unit, |b, unit| {
            b.iter(|| black_box(run_lines(black_box(unit))));
        });
        group.bench_with_input(BenchmarkId::new("single", lines), &joined, |b, src| {
            b.iter(|| black_box(run_single(black_box(src))));
        });
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_append }
criterion_main!(benches);
