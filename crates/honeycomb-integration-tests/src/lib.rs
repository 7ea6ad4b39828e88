//! Shared fixtures for the end-to-end tests.
//!
//! District outlines here are coarse stand-ins for the real boundaries:
//! axis-aligned boxes around each district's rough center, sized so
//! neighbors touch or overlap the way the real ones do.

use chrono::{NaiveDate, NaiveDateTime};
use geo::polygon;
use honeycomb_geo::{BoundaryFeature, GeoPoint};
use honeycomb_grid::Event;

/// `(name, center lon, center lat, half width in degrees)`
const DISTRICTS: [(&str, f64, f64, f64); 8] = [
    ("东城区", 116.416, 39.928, 0.025),
    ("西城区", 116.366, 39.912, 0.025),
    ("朝阳区", 116.486, 39.948, 0.045),
    ("海淀区", 116.298, 39.959, 0.045),
    ("丰台区", 116.287, 39.858, 0.040),
    ("石景山区", 116.195, 39.906, 0.030),
    ("延庆区", 115.975, 40.456, 0.060),
    ("怀柔区", 116.632, 40.316, 0.060),
];

/// Box outline of `half` degrees around `(lon, lat)`.
pub fn square(name: &str, lon: f64, lat: f64, half: f64) -> BoundaryFeature {
    BoundaryFeature::new(
        name,
        polygon![
            (x: lon - half, y: lat - half),
            (x: lon + half, y: lat - half),
            (x: lon + half, y: lat + half),
            (x: lon - half, y: lat + half),
        ],
    )
}

/// Stand-in outlines for the urban districts plus two outlying ones.
pub fn beijing_districts() -> Vec<BoundaryFeature> {
    DISTRICTS
        .iter()
        .map(|&(name, lon, lat, half)| square(name, lon, lat, half))
        .collect()
}

/// Center of a fixture district.
pub fn district_center(name: &str) -> Option<GeoPoint> {
    DISTRICTS
        .iter()
        .find(|d| d.0 == name)
        .map(|&(_, lon, lat, _)| GeoPoint::new(lon, lat))
}

pub fn timestamp(date: NaiveDate, seconds: u32) -> NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default() + chrono::Duration::seconds(i64::from(seconds % 86_400))
}

/// Deterministic pseudo-random events in a square of `half` degrees around
/// `center`, all on `date`.
pub fn scattered_events(center: GeoPoint, half: f64, date: NaiveDate, n: usize, seed: u64) -> Vec<Event> {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut next = move || {
        // xorshift64*
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        (state.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..n)
        .map(|k| {
            let lon = center.lon + half * (2.0 * next() - 1.0);
            let lat = center.lat + half * (2.0 * next() - 1.0);
            let severity = (next() * 4.0) as u8;
            Event::new(lon, lat, severity, timestamp(date, k as u32 * 37))
        })
        .collect()
}

/// `count` events at one spot with the given severity.
pub fn cluster(spot: GeoPoint, severity: u8, date: NaiveDate, count: usize) -> Vec<Event> {
    (0..count)
        .map(|k| Event::new(spot.lon, spot.lat, severity, timestamp(date, k as u32)))
        .collect()
}
