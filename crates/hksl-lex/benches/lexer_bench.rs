//! Lexer Benchmarks
//!
//! Run dengan: `cargo bench --package hksl-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hksl_lex::Lexer;
use hksl_util::diagnostic::Handler;

fn lexer_token_count(source: &str) -> usize {
    let handler = Handler::new();
    Lexer::collect_tokens(source, &handler).len()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "let x = 42; fn main() { let y = x + 1.0; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_let", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fn dot(a: float3, b: float3) -> float {
            return a + b;
        }

        fn main() {
            let light: float3 = 1.0;
            let n: float3 = 0.5;
            let d = dot(light, n);
            if d == 0.0 {
                d = 0.001;
            } else {
                d += 1.0;
            }
            return;
        }
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_comments(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_comments");

    group.bench_function("line_comments", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "// a shader entry point\nfn main() {\n    // nothing to do yet\n    return;\n}",
            ))
        })
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 123456;")))
    });

    group.bench_function("float", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 3.14159;")))
    });

    group.bench_function("trailing_dot", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 3.;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let x = 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("let very_long_variable_name = 42.0;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "let a = 1.0; let b = 2.0; let c = 3.0; let d = 4.0; let e = 5.0;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_comments,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
