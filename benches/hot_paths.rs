use criterion::{black_box, criterion_group, criterion_main, Criterion};
use firewatch::map::{ChoroplethLayer, County, Viewport};
use firewatch::risk::{annotate, classify, CountyFeature, RiskTable, FIPS_STATES};

/// Synthetic 0.5° county grid over the lower 48 with a risk entry for each
fn synthetic() -> (Vec<County>, RiskTable) {
    let mut counties = Vec::new();
    let mut scores = Vec::new();
    let mut n = 0usize;
    let mut lat = 25.0;
    while lat < 49.0 {
        let mut lon = -124.0;
        while lon < -67.0 {
            let (fips, abbr) = FIPS_STATES[n % FIPS_STATES.len()];
            let name = format!("C{}", n);
            let ring = vec![(lon, lat), (lon + 0.5, lat), (lon + 0.5, lat + 0.5), (lon, lat + 0.5), (lon, lat)];
            if let Some(county) = County::new(CountyFeature::new(name.clone(), fips), vec![ring]) {
                counties.push(county);
            }
            scores.push((format!("{} County, {}", name, abbr), (n % 101) as f64));
            n += 1;
            lon += 0.5;
        }
        lat += 0.5;
    }
    (counties, scores.into_iter().collect())
}

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_0_to_100", |b| {
        b.iter(|| {
            for r in 0..=100 {
                black_box(classify(black_box(r as f64)));
            }
        })
    });
}

fn bench_annotate(c: &mut Criterion) {
    let table: RiskTable = [("Travis County, TX".to_string(), 75.0)].into_iter().collect();
    let feature = CountyFeature::new("Travis", "48");
    c.bench_function("annotate_feature", |b| {
        b.iter(|| black_box(annotate(black_box(&feature), &table)))
    });
}

fn bench_render(c: &mut Criterion) {
    let (counties, table) = synthetic();
    let layer = ChoroplethLayer::build(counties, &table, annotate);
    // 200x50 terminal at the default California view
    let viewport = Viewport::new(-119.5, 37.5, 12.0, 400, 200);
    c.bench_function("render_200x50", |b| {
        b.iter(|| black_box(layer.render(200, 50, black_box(&viewport))))
    });
    c.bench_function("county_at", |b| {
        b.iter(|| black_box(layer.county_at(black_box(-97.7), black_box(30.3))))
    });
}

criterion_group!(benches, bench_classify, bench_annotate, bench_render);
criterion_main!(benches);
