//! Benchmarks for Honeycomb Grid
//!
//! Measures performance of:
//! - Lattice generation over growing extents
//! - Event aggregation
//! - Full grid builds (data extent)

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use honeycomb_geo::{BoundaryRegion, GeoPoint, Projection, UtmProjector};
use honeycomb_grid::{aggregate, Event, GridBuilder, GridConfig, HexLattice, DEFAULT_MAX_CELLS};

/// Deterministic events spread over a `span`-degree square around Beijing
fn synthetic_events(n: usize, span: f64) -> Vec<Event> {
    let ts = NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .unwrap_or_default();
    (0..n)
        .map(|k| {
            let a = (k as f64 * 0.618_033_988_7) % 1.0;
            let b = (k as f64 * 0.414_213_562_4) % 1.0;
            Event::new(116.2 + span * a, 39.8 + span * b, (k % 4) as u8, ts)
        })
        .collect()
}

fn extent_lattice(proj: &UtmProjector, span: f64) -> HexLattice {
    let corners = [GeoPoint::new(116.2, 39.8), GeoPoint::new(116.2 + span, 39.8 + span)];
    let region = BoundaryRegion::from_extent(corners.iter().filter_map(|p| proj.to_planar(*p).ok()), 5_000.0);
    HexLattice::generate(&region, 500.0, DEFAULT_MAX_CELLS, proj).unwrap_or_default()
}

/// Benchmark lattice generation
fn bench_lattice(c: &mut Criterion) {
    let mut group = c.benchmark_group("lattice_generate");
    group.sample_size(20);
    let proj = UtmProjector::default();

    for &span in &[0.05f64, 0.1, 0.2] {
        let cells = extent_lattice(&proj, span).candidate_count();
        group.throughput(Throughput::Elements(cells as u64));
        group.bench_with_input(BenchmarkId::from_parameter(span), &span, |b, &s| {
            b.iter(|| extent_lattice(&proj, black_box(s)))
        });
    }
    group.finish();
}

/// Benchmark the spatial join
fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let proj = UtmProjector::default();
    let lattice = extent_lattice(&proj, 0.2);

    for &n in &[1_000usize, 10_000, 50_000] {
        let events = synthetic_events(n, 0.2);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, ev| {
            b.iter(|| aggregate(&lattice, &proj, black_box(ev)))
        });
    }
    group.finish();
}

/// Benchmark a full build
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    group.sample_size(10);
    let Ok(builder) = GridBuilder::new(GridConfig::default()) else {
        return;
    };

    for &n in &[1_000usize, 10_000] {
        let events = synthetic_events(n, 0.2);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, ev| {
            b.iter(|| builder.build(black_box(ev)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_lattice, bench_aggregate, bench_build);

criterion_main!(benches);
