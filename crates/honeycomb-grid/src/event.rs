//! Input events and temporal slicing.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use honeycomb_geo::GeoPoint;

/// A geotagged, timestamped, severity-labeled observation.
///
/// Events arrive already cleaned by the ingestion side. Coordinates are not
/// re-validated here: an event that cannot be projected is skipped and
/// counted during aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub longitude: f64,
    pub latitude: f64,
    pub severity: u8,
    pub timestamp: NaiveDateTime,
}

impl Event {
    pub const fn new(longitude: f64, latitude: f64, severity: u8, timestamp: NaiveDateTime) -> Self {
        Self {
            longitude,
            latitude,
            severity,
            timestamp,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// Calendar day the event belongs to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Inclusive calendar-date window; either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// A window open on both ends.
    pub const fn all() -> Self {
        Self { start: None, end: None }
    }

    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Group events by calendar day, keeping their relative order.
pub fn slice_by_day<'a, I>(events: I) -> BTreeMap<NaiveDate, Vec<Event>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut days: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
    for event in events {
        days.entry(event.date()).or_default().push(*event);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn date_range_is_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
        let range = DateRange::new(Some(d(2)), Some(d(4)));
        assert!(!range.contains(d(1)));
        assert!(range.contains(d(2)));
        assert!(range.contains(d(4)));
        assert!(!range.contains(d(5)));
        assert!(DateRange::all().contains(d(31)));
        assert!(DateRange::new(None, Some(d(3))).contains(d(1)));
    }

    #[test]
    fn slices_group_by_day_in_order() {
        let events = vec![
            Event::new(116.3, 39.9, 1, at(2, 23)),
            Event::new(116.4, 39.9, 2, at(1, 8)),
            Event::new(116.5, 39.9, 3, at(2, 0)),
        ];
        let days = slice_by_day(&events);
        assert_eq!(days.len(), 2);
        let keys: Vec<_> = days.keys().map(|d| d.to_string()).collect();
        assert_eq!(keys, vec!["2024-05-01", "2024-05-02"]);
        let second = &days[&NaiveDate::from_ymd_opt(2024, 5, 2).unwrap()];
        assert_eq!(second.iter().map(|e| e.severity).collect::<Vec<_>>(), vec![1, 3]);
    }
}
