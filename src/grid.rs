// Maidenhead Grid Square Codec
// Converts between lat/lon and Maidenhead locators (4, 6, 8 or 10 characters)
//
// Layout of a 10-character locator, one lon/lat pair per level:
//   field (A-R)  square (0-9)  subsquare (a-x)  ext. square (0-9)  ext. subsquare (a-x)
//   20° x 10°    2° x 1°       5' x 2.5'        30" x 15"          1.25" x 0.625"
//
// Longitude cells are always twice as wide as latitude cells are tall.
// Origin is at -180°, -90°. Pure computation, no lookups.

use serde::Serialize;

use crate::error::{LogbookError, Result};

/// Locator lengths accepted by the encoder
pub const GRID_PRECISIONS: [usize; 4] = [4, 6, 8, 10];

/// Mean Earth radius used for great-circle distances
const EARTH_RADIUS_KM: f64 = 6371.0;

struct Level {
    base: u32,
    letters: bool,
    lon_size: f64,
    lat_size: f64,
}

const LEVELS: [Level; 5] = [
    Level { base: 18, letters: true, lon_size: 20.0, lat_size: 10.0 },
    Level { base: 10, letters: false, lon_size: 2.0, lat_size: 1.0 },
    Level { base: 24, letters: true, lon_size: 2.0 / 24.0, lat_size: 1.0 / 24.0 },
    Level { base: 10, letters: false, lon_size: 2.0 / 240.0, lat_size: 1.0 / 240.0 },
    Level { base: 24, letters: true, lon_size: 2.0 / 5760.0, lat_size: 1.0 / 5760.0 },
];

/// Corners of a locator cell, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GridBounds {
    /// Center of the cell as (latitude, longitude)
    pub fn center(&self) -> (f64, f64) {
        ((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }
}

/// Grammar check: `^[A-R]{2}[0-9]{2}([a-x]{2}([0-9]{2}([a-x]{2})?)?)?$`, case-insensitive
pub fn is_valid_grid(grid: &str) -> bool {
    let bytes = grid.as_bytes();
    if !GRID_PRECISIONS.contains(&bytes.len()) {
        return false;
    }

    bytes.chunks(2).zip(LEVELS.iter()).all(|(pair, level)| {
        pair.iter().all(|&b| {
            if level.letters {
                let upper = b.to_ascii_uppercase();
                let last = b'A' + (level.base - 1) as u8;
                (b'A'..=last).contains(&upper)
            } else {
                b.is_ascii_digit()
            }
        })
    })
}

/// Encode a position as a Maidenhead locator of `precision` characters.
///
/// Fails with `InvalidArgument` when latitude is outside [-90, 90], longitude
/// outside [-180, 180], or precision is not one of 4, 6, 8, 10.
pub fn latlon_to_grid(lat: f64, lon: f64, precision: usize) -> Result<String> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(LogbookError::InvalidArgument(format!(
            "latitude {} is outside [-90, 90]",
            lat
        )));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(LogbookError::InvalidArgument(format!(
            "longitude {} is outside [-180, 180]",
            lon
        )));
    }
    if !GRID_PRECISIONS.contains(&precision) {
        return Err(LogbookError::InvalidArgument(format!(
            "precision {} is not one of 4, 6, 8, 10",
            precision
        )));
    }

    let mut lon_rem = lon + 180.0;
    let mut lat_rem = lat + 90.0;
    let mut grid = String::with_capacity(precision);

    for level in LEVELS.iter().take(precision / 2) {
        // Clamp: +180°/+90° land exactly on the far edge, and float
        // remainders can drift a hair outside the cell.
        let lon_idx = ((lon_rem / level.lon_size).floor().max(0.0) as u32).min(level.base - 1);
        let lat_idx = ((lat_rem / level.lat_size).floor().max(0.0) as u32).min(level.base - 1);

        lon_rem -= f64::from(lon_idx) * level.lon_size;
        lat_rem -= f64::from(lat_idx) * level.lat_size;

        grid.push(symbol(level, lon_idx));
        grid.push(symbol(level, lat_idx));
    }

    Ok(grid.to_uppercase())
}

fn symbol(level: &Level, index: u32) -> char {
    let base = if level.letters { b'A' } else { b'0' };
    char::from(base + index as u8)
}

/// Bounds of the cell described by a locator, `None` if the locator is invalid
pub fn grid_bounds(grid: &str) -> Option<GridBounds> {
    if !is_valid_grid(grid) {
        return None;
    }

    let upper = grid.to_ascii_uppercase();
    let bytes = upper.as_bytes();

    let mut west = -180.0;
    let mut south = -90.0;
    let mut lon_size = 360.0;
    let mut lat_size = 180.0;

    for (pair, level) in bytes.chunks(2).zip(LEVELS.iter()) {
        let origin = if level.letters { b'A' } else { b'0' };
        west += f64::from(pair[0] - origin) * level.lon_size;
        south += f64::from(pair[1] - origin) * level.lat_size;
        lon_size = level.lon_size;
        lat_size = level.lat_size;
    }

    Some(GridBounds {
        south,
        west,
        north: south + lat_size,
        east: west + lon_size,
    })
}

/// Convert a locator to the (latitude, longitude) of its cell center.
///
/// This is a recognizer, not a strict parser: anything failing the grammar
/// check yields `None`.
pub fn grid_to_latlon(grid: &str) -> Option<(f64, f64)> {
    grid_bounds(grid).map(|bounds| bounds.center())
}

/// Great-circle distance in kilometres between two (lat, lon) points
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}
