use criterion::{black_box, criterion_group, criterion_main, Criterion};
use satsuite::{cdcl, dpll, probsat, walksat};
use std::io::Write;
use std::path::Path;

fn write_cnf(contents: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

/// `n+1` pigeons into `n` holes: classically UNSAT, and a standard CDCL
/// stress case since it needs non-chronological backjumping to close fast.
fn pigeonhole_cnf(n: usize) -> String {
    let num_vars = (n + 1) * n;
    let mut clauses = Vec::new();
    for pigeon in 0..=n {
        let clause: Vec<String> = (0..n).map(|hole| (pigeon * n + hole + 1).to_string()).collect();
        clauses.push(clause.join(" "));
    }
    for hole in 0..n {
        for p1 in 0..=n {
            for p2 in (p1 + 1)..=n {
                clauses.push(format!("-{} -{}", p1 * n + hole + 1, p2 * n + hole + 1));
            }
        }
    }
    let mut out = format!("p cnf {} {}\n", num_vars, clauses.len());
    for c in clauses {
        out.push_str(&c);
        out.push_str(" 0\n");
    }
    out
}

/// A satisfiable chain of implications, `x_i -> x_{i+2}` for each `i`.
fn chain_cnf(n: usize) -> String {
    let mut clauses = vec!["1 2".to_string()];
    for i in 1..=(n - 2) {
        clauses.push(format!("-{} {}", i, i + 2));
        clauses.push(format!("-{} {}", i + 1, i + 2));
    }
    let mut out = format!("p cnf {} {}\n", n, clauses.len());
    for c in clauses {
        out.push_str(&c);
        out.push_str(" 0\n");
    }
    out
}

fn bench_cdcl_pigeonhole(c: &mut Criterion) {
    let mut group = c.benchmark_group("cdcl_pigeonhole");
    for n in [3, 4, 5] {
        let file = write_cnf(&pigeonhole_cnf(n));
        let path = file.path().to_path_buf();
        group.bench_with_input(format!("php_{}_{}", n + 1, n), &path, |b, path: &std::path::PathBuf| {
            b.iter(|| cdcl::solve(black_box(path.as_path())).unwrap())
        });
    }
    group.finish();
}

fn bench_dpll_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("dpll_chain");
    for n in [10, 20, 30] {
        let file = write_cnf(&chain_cnf(n));
        let path = file.path().to_path_buf();
        group.bench_with_input(format!("chain_{n}"), &path, |b, path: &std::path::PathBuf| {
            b.iter(|| dpll::solve_baseline(black_box(path.as_path())).unwrap())
        });
    }
    group.finish();
}

fn bench_local_search(c: &mut Criterion) {
    let file = write_cnf(&chain_cnf(20));
    let path: &Path = file.path();
    let mut group = c.benchmark_group("local_search_chain_20");
    group.bench_function("walksat", |b| {
        b.iter(|| walksat::solve(black_box(path), 2000, 0.5, 5, Some(1)).unwrap())
    });
    group.bench_function("probsat", |b| {
        b.iter(|| probsat::solve(black_box(path), 2000, 0.9, 5, Some(1)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_cdcl_pigeonhole, bench_dpll_chain, bench_local_search);
criterion_main!(benches);
