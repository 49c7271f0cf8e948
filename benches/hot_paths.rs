use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geo_types::{LineString, Polygon};
use quake_map::classify::{classify, Boundary, BoundaryShape};
use quake_map::data::feed::{parse_feed, PointRecord};
use quake_map::location::Location;
use quake_map::markers::{CityInfo, MarkerStore};
use quake_map::selection::SelectionController;

/// A grid of rough 40-vertex "countries" covering -60..60 lat, -180..180 lon
fn countries() -> Vec<Boundary> {
    let mut boundaries = Vec::new();
    for row in 0..6 {
        for col in 0..18 {
            let (lon0, lat0) = (-180.0 + col as f64 * 20.0, -60.0 + row as f64 * 20.0);
            let ring: Vec<(f64, f64)> = (0..40)
                .map(|i| {
                    let angle = i as f64 / 40.0 * std::f64::consts::TAU;
                    (lon0 + 10.0 + 8.0 * angle.cos(), lat0 + 10.0 + 8.0 * angle.sin())
                })
                .collect();
            let shape = BoundaryShape::Simple(Polygon::new(LineString::from(ring), vec![]));
            boundaries.push(Boundary::new(format!("C{}-{}", row, col), shape));
        }
    }
    boundaries
}

fn locations(n: usize) -> Vec<Location> {
    (0..n)
        .map(|i| {
            let t = i as f64 * 0.618_033_988_75;
            Location::new((t * 97.0) % 140.0 - 70.0, (t * 211.0) % 360.0 - 180.0)
        })
        .collect()
}

fn feed_xml(n: usize) -> String {
    let mut xml = String::from(
        r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:georss="http://www.georss.org/georss">"#,
    );
    for (i, loc) in locations(n).iter().enumerate() {
        xml.push_str(&format!(
            r#"<entry><title>M {}.{} - bench</title><georss:point>{:.4} {:.4}</georss:point><georss:elev>-{}</georss:elev><category label="Age" term="Past Day"/></entry>"#,
            2 + i % 6,
            i % 10,
            loc.lat,
            loc.lon,
            1000 + i * 37
        ));
    }
    xml.push_str("</feed>");
    xml
}

fn bench_parse_feed(c: &mut Criterion) {
    let xml = feed_xml(1000);
    c.bench_function("parse_feed_1000", |b| b.iter(|| parse_feed(black_box(&xml))));
}

fn bench_classify(c: &mut Criterion) {
    let boundaries = countries();
    let points = locations(1000);
    c.bench_function("classify_1000", |b| {
        b.iter(|| {
            points
                .iter()
                .filter(|p| classify(black_box(p), &boundaries).is_land)
                .count()
        })
    });
}

fn bench_click_filter(c: &mut Criterion) {
    let records: Vec<PointRecord> = locations(1000)
        .into_iter()
        .map(|loc| {
            let mut r = PointRecord::new(loc);
            r.magnitude = Some(5.0);
            r
        })
        .collect();
    let cities: Vec<(Location, CityInfo)> = locations(3000)
        .into_iter()
        .enumerate()
        .map(|(i, loc)| {
            let info = CityInfo {
                name: format!("city{}", i),
                country: None,
                population: Some(i as f64 * 1000.0),
            };
            (loc, info)
        })
        .collect();
    let mut store = MarkerStore::build(countries(), cities, records);
    let target = store.quakes[500].location;
    let mut selection = SelectionController::new();

    c.bench_function("click_filter_and_reset", |b| {
        b.iter(|| {
            selection.on_pointer_click(&mut store, |m| m.location == target);
            selection.on_pointer_click(&mut store, |_| false);
        })
    });
}

criterion_group!(benches, bench_parse_feed, bench_classify, bench_click_filter);
criterion_main!(benches);
