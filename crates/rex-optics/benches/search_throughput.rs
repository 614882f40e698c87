use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rex_core::SearchInterval;
use rex_optics::{analyze, closest_stable_unstable, AnalysisConfig, SearchOpts};
use rex_track::HenonLine;

fn bench_search(c: &mut Criterion) {
    let line = HenonLine::default();
    let opts = SearchOpts::default();
    c.bench_function("henon_bisection", |b| {
        b.iter(|| {
            let interval =
                closest_stable_unstable(&line, black_box(SearchInterval::default()), &opts)
                    .expect("search");
            black_box(interval);
        });
    });
}

fn bench_analysis(c: &mut Criterion) {
    let line = HenonLine::default();
    let config = AnalysisConfig::default();
    c.bench_function("henon_full_analysis", |b| {
        b.iter(|| {
            let report = analyze(&line, black_box(&config)).expect("analysis");
            black_box(report.analysis_hash);
        });
    });
}

criterion_group!(benches, bench_search, bench_analysis);
criterion_main!(benches);
