//! Benchmarks for the editing operations a panel performs.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use vizedit_buffer::TextBuffer;

/// Generates a script of `lines` lines.
fn generate_script(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("ens_{i} = nengo.Ensemble(n_neurons=100, dimensions=1)\n"))
        .collect()
}

/// Inbound messages replace the whole buffer.
fn bench_replace_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_text");

    for size in [10, 100, 1000, 10000].iter() {
        let old = generate_script(*size);
        let new = generate_script(*size + 1);

        group.bench_with_input(BenchmarkId::new("full_buffer", size), &new, |b, new| {
            b.iter_with_setup(
                || TextBuffer::from(old.as_str()),
                |mut buffer| {
                    buffer.replace_text(black_box(new));
                    black_box(buffer)
                },
            )
        });
    }

    group.finish();
}

/// Local typing at the cursor.
fn bench_typing(c: &mut Criterion) {
    let base = generate_script(1000);

    c.bench_function("type_100_chars_mid_buffer", |b| {
        b.iter_with_setup(
            || {
                let mut buffer = TextBuffer::from(base.as_str());
                let mid = buffer.len_chars() / 2;
                buffer.set_cursor(mid);
                buffer
            },
            |mut buffer| {
                for _ in 0..100 {
                    buffer.type_text(black_box("x")).unwrap();
                }
                black_box(buffer)
            },
        )
    });
}

/// Reading the buffer back out, as `send_content` does.
fn bench_text(c: &mut Criterion) {
    let buffer = TextBuffer::from(generate_script(10000).as_str());
    c.bench_function("text_10000_lines", |b| b.iter(|| black_box(buffer.text().len())));
}

criterion_group!(benches, bench_replace_text, bench_typing, bench_text);
criterion_main!(benches);
