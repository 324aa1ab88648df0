//! Region Coordinates
//! Fixed latitude/longitude for the 17 top-level Korean administrative regions.

use serde::Serialize;
use std::collections::HashMap;

/// Centre of the national bubble map.
pub const MAP_CENTER: Coordinate = Coordinate {
    lat: 35.9,
    lon: 127.7,
};

const KOREA_REGIONS: [(&str, f64, f64); 17] = [
    ("서울", 37.5665, 126.9780),
    ("부산", 35.1796, 129.0756),
    ("대구", 35.8714, 128.6014),
    ("인천", 37.4563, 126.7052),
    ("광주", 35.1601, 126.8514),
    ("대전", 36.3504, 127.3845),
    ("울산", 35.5384, 129.3114),
    ("세종", 36.4800, 127.2890),
    ("경기", 37.4138, 127.5183),
    ("강원", 37.8228, 128.1555),
    ("충북", 36.6357, 127.4914),
    ("충남", 36.6588, 126.6728),
    ("전북", 35.8203, 127.1088),
    ("전남", 34.8161, 126.4629),
    ("경북", 36.4919, 128.8889),
    ("경남", 35.4606, 128.2132),
    ("제주", 33.4996, 126.5312),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Region name to map position. Lookup is by exact name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionCoordinates {
    entries: HashMap<String, Coordinate>,
}

impl RegionCoordinates {
    /// The built-in table of 17 regions.
    pub fn korea() -> Self {
        Self::from_entries(
            KOREA_REGIONS
                .iter()
                .map(|&(name, lat, lon)| (name.to_string(), Coordinate { lat, lon })),
        )
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Coordinate)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Replace or add entries, e.g. from configuration.
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (String, Coordinate)>,
    ) -> Self {
        self.entries.extend(overrides);
        self
    }

    pub fn get(&self, region: &str) -> Option<Coordinate> {
        self.entries.get(region).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
