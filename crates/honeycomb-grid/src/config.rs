//! Grid build configuration.

use honeycomb_geo::{DistrictFilter, UtmZone, DEFAULT_MARGIN_METERS};

use crate::error::{Error, Result};

/// Default hexagon edge length (meters).
pub const DEFAULT_HEX_SIZE_METERS: f64 = 500.0;

/// Largest lattice (in candidate cells) a single build may lay out.
pub const DEFAULT_MAX_CELLS: usize = 500_000;

/// Districts tiled when no other list is configured.
pub const DEFAULT_TARGET_DISTRICTS: [&str; 6] = ["海淀区", "朝阳区", "东城区", "西城区", "石景山区", "丰台区"];

/// Configuration for building hexagon grids.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Hexagon edge length in meters
    pub hex_size_meters: f64,

    /// Boundary features to keep; empty keeps all of them
    pub target_districts: Vec<String>,

    /// Outward margin added to the tiled bounding box, meters
    pub margin_meters: f64,

    /// Planar projection zone
    pub zone: UtmZone,

    /// Upper bound on lattice candidates; larger coverings yield an empty grid
    pub max_cells: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            hex_size_meters: DEFAULT_HEX_SIZE_METERS,
            target_districts: DEFAULT_TARGET_DISTRICTS.iter().map(|s| s.to_string()).collect(),
            margin_meters: DEFAULT_MARGIN_METERS,
            zone: UtmZone::default(),
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

impl GridConfig {
    /// Create config from environment variables with defaults.
    ///
    /// - `HONEYCOMB_HEX_SIZE`: edge length in meters
    /// - `HONEYCOMB_DISTRICTS`: comma separated district names
    /// - `HONEYCOMB_MARGIN`: bounding box margin in meters
    /// - `HONEYCOMB_UTM_ZONE`: e.g. `50N`
    /// - `HONEYCOMB_MAX_CELLS`: lattice size limit
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`GridConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("HONEYCOMB_HEX_SIZE") {
            config.hex_size_meters = parse_meters("HONEYCOMB_HEX_SIZE", &raw)?;
        }

        if let Some(raw) = lookup("HONEYCOMB_DISTRICTS") {
            config.target_districts = raw
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect();
        }

        if let Some(raw) = lookup("HONEYCOMB_MARGIN") {
            config.margin_meters = parse_meters("HONEYCOMB_MARGIN", &raw)?;
        }

        if let Some(raw) = lookup("HONEYCOMB_UTM_ZONE") {
            config.zone = raw
                .parse()
                .map_err(|e| Error::InvalidConfig(format!("HONEYCOMB_UTM_ZONE: {e}")))?;
        }

        if let Some(raw) = lookup("HONEYCOMB_MAX_CELLS") {
            config.max_cells = raw
                .trim()
                .parse()
                .map_err(|e| Error::InvalidConfig(format!("HONEYCOMB_MAX_CELLS={raw:?}: {e}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.hex_size_meters.is_finite() || self.hex_size_meters <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "hex_size_meters must be positive, got {}",
                self.hex_size_meters
            )));
        }
        if !self.margin_meters.is_finite() || self.margin_meters < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margin_meters must be non-negative, got {}",
                self.margin_meters
            )));
        }
        if self.max_cells == 0 {
            return Err(Error::InvalidConfig("max_cells must be positive".into()));
        }
        Ok(())
    }

    /// The allow-list built from `target_districts`.
    pub fn district_filter(&self) -> DistrictFilter {
        DistrictFilter::new(self.target_districts.iter().cloned())
    }
}

fn parse_meters(key: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| Error::InvalidConfig(format!("{key}={raw:?}: {e}")))
}
