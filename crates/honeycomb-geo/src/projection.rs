//! Geographic ⇄ planar projection.
//!
//! Hexagons are generated in a metric plane so they are true regular
//! hexagons; the shipped projection is WGS84 → UTM (transverse Mercator)
//! using the 6th-order Krüger series, which is accurate to well under a
//! millimetre inside a zone.
//!
//! # Valid Range
//!
//! - latitude within the UTM band [-80°, 84°]
//! - longitude less than 90° from the zone's central meridian
//!
//! Anything else fails with [`Error::Projection`].

use std::str::FromStr;

use honeycomb_topology::PlanarPoint;

use crate::error::{Error, Result};
use crate::GeoPoint;

/// WGS84 semi-major axis (meters).
const WGS84_A: f64 = 6_378_137.0;

/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// UTM central scale factor.
const UTM_K0: f64 = 0.9996;

const FALSE_EASTING: f64 = 500_000.0;

/// False northing applied in the southern hemisphere.
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

const MIN_LAT: f64 = -80.0;
const MAX_LAT: f64 = 84.0;

/// Maximum angular distance from the central meridian (exclusive).
const MAX_MERIDIAN_OFFSET: f64 = 90.0;

/// Bidirectional conversion between geographic and planar coordinates.
///
/// Implementations are exact inverses of each other up to floating-point
/// tolerance and carry no internal error state.
pub trait Projection: Send + Sync {
    /// Project a geographic position onto the plane (meters).
    fn to_planar(&self, point: GeoPoint) -> Result<PlanarPoint>;

    /// Map a planar position back to geographic coordinates.
    fn to_geo(&self, point: PlanarPoint) -> Result<GeoPoint>;
}

/// Hemisphere of a UTM zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

/// A UTM zone: number 1..=60 plus hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtmZone {
    number: u8,
    hemisphere: Hemisphere,
}

impl UtmZone {
    /// Zone 50 north (EPSG:32650), covering Beijing.
    pub const BEIJING: Self = Self {
        number: 50,
        hemisphere: Hemisphere::North,
    };

    /// Create a zone, rejecting numbers outside 1..=60.
    pub fn new(number: u8, hemisphere: Hemisphere) -> Result<Self> {
        if !(1..=60).contains(&number) {
            return Err(Error::InvalidZone(format!("zone number {number} outside 1..=60")));
        }
        Ok(Self { number, hemisphere })
    }

    pub const fn number(&self) -> u8 {
        self.number
    }

    pub const fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Longitude of the central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        f64::from(self.number) * 6.0 - 183.0
    }

    /// EPSG code of the WGS84 / UTM zone.
    pub fn epsg(&self) -> u32 {
        let base = match self.hemisphere {
            Hemisphere::North => 32_600,
            Hemisphere::South => 32_700,
        };
        base + u32::from(self.number)
    }

    fn false_northing(&self) -> f64 {
        match self.hemisphere {
            Hemisphere::North => 0.0,
            Hemisphere::South => FALSE_NORTHING_SOUTH,
        }
    }
}

impl Default for UtmZone {
    fn default() -> Self {
        Self::BEIJING
    }
}

impl FromStr for UtmZone {
    type Err = Error;

    /// Parse `"50N"`, `"33s"`, ...
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let hemisphere = match s.chars().last() {
            Some('N' | 'n') => Hemisphere::North,
            Some('S' | 's') => Hemisphere::South,
            _ => return Err(Error::InvalidZone(format!("{s:?}: expected <number><N|S>"))),
        };
        let number = s[..s.len() - 1]
            .parse::<u8>()
            .map_err(|_| Error::InvalidZone(format!("{s:?}: bad zone number")))?;
        Self::new(number, hemisphere)
    }
}

impl std::fmt::Display for UtmZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hemi = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{}", self.number, hemi)
    }
}

/// Transverse Mercator projector for one UTM zone.
#[derive(Debug, Clone)]
pub struct UtmProjector {
    zone: UtmZone,
    lon0: f64,
    /// k0 * rectifying radius
    scale: f64,
    eccentricity: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
}

impl UtmProjector {
    pub fn new(zone: UtmZone) -> Self {
        let f = WGS84_F;
        let n = f / (2.0 - f);
        let [n2, n3, n4, n5, n6] = [n.powi(2), n.powi(3), n.powi(4), n.powi(5), n.powi(6)];

        let rectifying = WGS84_A / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0 + n6 / 256.0);

        let alpha = [
            n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0 - 127.0 * n5 / 288.0
                + 7891.0 * n6 / 37800.0,
            13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0 + 281.0 * n5 / 630.0
                - 1_983_433.0 * n6 / 1_935_360.0,
            61.0 * n3 / 240.0 - 103.0 * n4 / 140.0 + 15061.0 * n5 / 26880.0 + 167_603.0 * n6 / 181_440.0,
            49561.0 * n4 / 161_280.0 - 179.0 * n5 / 168.0 + 6_601_661.0 * n6 / 7_257_600.0,
            34729.0 * n5 / 80640.0 - 3_418_889.0 * n6 / 1_995_840.0,
            212_378_941.0 * n6 / 319_334_400.0,
        ];

        let beta = [
            n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0 - 81.0 * n5 / 512.0
                + 96199.0 * n6 / 604_800.0,
            n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0 + 46.0 * n5 / 105.0 - 1_118_711.0 * n6 / 3_870_720.0,
            17.0 * n3 / 480.0 - 37.0 * n4 / 840.0 - 209.0 * n5 / 4480.0 + 5569.0 * n6 / 90720.0,
            4397.0 * n4 / 161_280.0 - 11.0 * n5 / 504.0 - 830_251.0 * n6 / 7_257_600.0,
            4583.0 * n5 / 161_280.0 - 108_847.0 * n6 / 3_991_680.0,
            20_648_693.0 * n6 / 638_668_800.0,
        ];

        Self {
            zone,
            lon0: zone.central_meridian(),
            scale: UTM_K0 * rectifying,
            eccentricity: (f * (2.0 - f)).sqrt(),
            alpha,
            beta,
        }
    }

    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Conformal latitude tangent τ' from geodetic latitude tangent τ.
    fn conformal_tan(&self, tau: f64) -> f64 {
        let e = self.eccentricity;
        let sigma = (e * (e * tau / (1.0 + tau * tau).sqrt()).atanh()).sinh();
        tau * (1.0 + sigma * sigma).sqrt() - sigma * (1.0 + tau * tau).sqrt()
    }
}

impl Default for UtmProjector {
    fn default() -> Self {
        Self::new(UtmZone::default())
    }
}

impl Projection for UtmProjector {
    fn to_planar(&self, point: GeoPoint) -> Result<PlanarPoint> {
        let GeoPoint { lon, lat } = point;
        let fail = |reason| Error::Projection { lon, lat, reason };

        if !point.is_valid() {
            return Err(fail("outside WGS84 range"));
        }
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(fail("latitude outside UTM band"));
        }
        let dlon = wrap_degrees(lon - self.lon0);
        if dlon.abs() >= MAX_MERIDIAN_OFFSET {
            return Err(fail("too far from central meridian"));
        }

        let lambda = dlon.to_radians();
        let tau_p = self.conformal_tan(lat.to_radians().tan());

        let xi_p = tau_p.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (tau_p * tau_p + lambda.cos().powi(2)).sqrt()).asinh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += a * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        Ok(PlanarPoint::new(
            self.scale * eta + FALSE_EASTING,
            self.scale * xi + self.zone.false_northing(),
        ))
    }

    fn to_geo(&self, point: PlanarPoint) -> Result<GeoPoint> {
        let PlanarPoint { x, y } = point;
        let fail = |reason| Error::Unprojection { x, y, reason };

        if !x.is_finite() || !y.is_finite() {
            return Err(fail("non-finite coordinate"));
        }

        let eta = (x - FALSE_EASTING) / self.scale;
        let xi = (y - self.zone.false_northing()) / self.scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi_p -= b * (k * xi).sin() * (k * eta).cosh();
            eta_p -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta_p = eta_p.sinh();
        let cos_xi_p = xi_p.cos();
        let tau_p = xi_p.sin() / (sinh_eta_p * sinh_eta_p + cos_xi_p * cos_xi_p).sqrt();

        // Newton-Raphson on τ' = conformal_tan(τ)
        let e2 = self.eccentricity * self.eccentricity;
        let mut tau = tau_p;
        for _ in 0..16 {
            let tau_i_p = self.conformal_tan(tau);
            let delta = (tau_p - tau_i_p) / (1.0 + tau_i_p * tau_i_p).sqrt() * (1.0 + (1.0 - e2) * tau * tau)
                / ((1.0 - e2) * (1.0 + tau * tau).sqrt());
            tau += delta;
            if delta.abs() < 1e-12 {
                break;
            }
        }

        let lat = tau.atan().to_degrees();
        let lon = wrap_degrees(self.lon0 + sinh_eta_p.atan2(cos_xi_p).to_degrees());
        let geo = GeoPoint::new(lon, lat);
        if !geo.is_valid() {
            return Err(fail("result outside WGS84 range"));
        }
        Ok(geo)
    }
}

/// Normalize an angle to [-180, 180).
fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn central_meridian_maps_to_false_easting() {
        let p = UtmProjector::default().to_planar(GeoPoint::new(117.0, 0.0)).unwrap();
        assert_abs_diff_eq!(p.x, 500_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn known_points() {
        let beijing = UtmProjector::default().to_planar(GeoPoint::new(116.4074, 39.9042)).unwrap();
        assert_abs_diff_eq!(beijing.x, 449_345.06, epsilon = 0.05);
        assert_abs_diff_eq!(beijing.y, 4_417_292.49, epsilon = 0.05);

        let paris = UtmProjector::new("31N".parse().unwrap())
            .to_planar(GeoPoint::new(2.2945, 48.858_194))
            .unwrap();
        assert_abs_diff_eq!(paris.x, 448_251.79, epsilon = 0.05);
        assert_abs_diff_eq!(paris.y, 5_411_932.01, epsilon = 0.05);
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let zone = UtmZone::new(56, Hemisphere::South).unwrap();
        let p = UtmProjector::new(zone).to_planar(GeoPoint::new(151.2093, -33.8688)).unwrap();
        assert!(p.y > 6_000_000.0 && p.y < FALSE_NORTHING_SOUTH);
        let back = UtmProjector::new(zone).to_geo(p).unwrap();
        assert_abs_diff_eq!(back.lon, 151.2093, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lat, -33.8688, epsilon = 1e-9);
    }

    #[test]
    fn invalid_inputs_fail() {
        let proj = UtmProjector::default();
        for p in [
            GeoPoint::new(f64::NAN, 40.0),
            GeoPoint::new(200.0, 40.0),
            GeoPoint::new(116.0, 95.0),
            GeoPoint::new(116.0, 85.0),
            GeoPoint::new(-100.0, 40.0),
        ] {
            assert!(matches!(proj.to_planar(p), Err(Error::Projection { .. })), "{p} should fail");
        }
        assert!(matches!(
            proj.to_geo(PlanarPoint::new(f64::INFINITY, 0.0)),
            Err(Error::Unprojection { .. })
        ));
    }

    #[test]
    fn zone_parsing() {
        assert_eq!("50N".parse::<UtmZone>().unwrap(), UtmZone::BEIJING);
        assert_eq!("33s".parse::<UtmZone>().unwrap().hemisphere(), Hemisphere::South);
        assert!("61N".parse::<UtmZone>().is_err());
        assert!("50".parse::<UtmZone>().is_err());
        assert!("".parse::<UtmZone>().is_err());
        assert_eq!(UtmZone::BEIJING.to_string(), "50N");
        assert_eq!(UtmZone::BEIJING.epsg(), 32650);
        assert_eq!(UtmZone::BEIJING.central_meridian(), 117.0);
    }

    #[test]
    fn wrap_degrees_range() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-296.0), 64.0);
    }

    proptest! {
        #[test]
        fn round_trip_within_tolerance(lon in 110.0f64..124.0, lat in 30.0f64..50.0) {
            let proj = UtmProjector::default();
            let planar = proj.to_planar(GeoPoint::new(lon, lat)).unwrap();
            let back = proj.to_geo(planar).unwrap();
            prop_assert!((back.lon - lon).abs() < 1e-6);
            prop_assert!((back.lat - lat).abs() < 1e-6);
        }
    }
}
