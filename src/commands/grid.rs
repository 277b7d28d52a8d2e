//! Maidenhead locator commands

use serde::Serialize;

use crate::error::{LogbookError, Result};
use crate::grid::{distance_km, grid_bounds, latlon_to_grid, GridBounds};

#[derive(Debug, Serialize)]
pub struct EncodedGrid {
    pub grid: String,
    pub precision: usize,
}

#[derive(Debug, Serialize)]
pub struct DecodedGrid {
    pub grid: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bounds: GridBounds,
}

pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<EncodedGrid> {
    let grid = latlon_to_grid(latitude, longitude, precision)?;
    Ok(EncodedGrid { grid, precision })
}

pub fn decode(locator: &str) -> Result<DecodedGrid> {
    let locator = locator.trim();
    let bounds = grid_bounds(locator).ok_or_else(|| {
        LogbookError::InvalidArgument(format!("'{}' is not a Maidenhead locator", locator))
    })?;
    let (latitude, longitude) = bounds.center();
    Ok(DecodedGrid {
        grid: locator.to_uppercase(),
        latitude,
        longitude,
        bounds,
    })
}

#[derive(Debug, Serialize)]
pub struct GridDistance {
    pub from: String,
    pub to: String,
    /// Between cell centers
    pub km: f64,
}

pub fn distance(from: &str, to: &str) -> Result<GridDistance> {
    let a = decode(from)?;
    let b = decode(to)?;
    let km = distance_km((a.latitude, a.longitude), (b.latitude, b.longitude));
    Ok(GridDistance {
        from: a.grid,
        to: b.grid,
        km,
    })
}
