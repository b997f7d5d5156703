//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package oinkc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oinkc_lex::Lexer;

fn token_count(source: &str) -> usize {
    Lexer::new(source).tokenize().map(|t| t.len()).unwrap_or(0)
}

fn bench_lexer_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let decl = "# 😀 🐷 🐖x🐖 @ 42 #\n";
    group.throughput(Throughput::Bytes(decl.len() as u64));
    group.bench_function("declaration_line", |b| {
        b.iter(|| token_count(black_box(decl)))
    });

    let mood = "#~ 😀 🐷 🐖x🐖 @ 10 ❤️ 5 ~#\n";
    group.bench_function("mood_line", |b| b.iter(|| token_count(black_box(mood))));

    group.finish();
}

fn bench_lexer_program(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_program");

    let mut source = String::from("# 😀 🐷 🐖c🐖 @ 0 #\n");
    source.push_str("# OINK 🐖c🐖 < 1000 #\n# 🐖🐖🐖 #\n");
    for _ in 0..50 {
        source.push_str("# 🐖c🐖 @ 🐖c🐖 ❤️ 1 #\n");
    }
    source.push_str("# 🐖🐖🐖 #\n# ... 🐖c🐖 ... #");

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("loop_heavy", |b| {
        b.iter(|| token_count(black_box(&source)))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer_simple, bench_lexer_program);
criterion_main!(benches);
