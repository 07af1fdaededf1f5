//! Model extent and random event positions.

use serde::{Deserialize, Serialize};

use crate::parameter::ParameterSpec;

/// Axis-aligned bounds of the model volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Extent {
    /// Create an extent from `[x_min, x_max, y_min, y_max, z_min, z_max]`.
    #[must_use]
    pub fn from_bounds(bounds: [f64; 6]) -> Self {
        let [x_min, x_max, y_min, y_max, z_min, z_max] = bounds;
        debug_assert!(x_min <= x_max, "x bounds out of order");
        debug_assert!(y_min <= y_max, "y bounds out of order");
        debug_assert!(z_min <= z_max, "z bounds out of order");

        Self {
            x_min,
            x_max,
            y_min,
            y_max,
            z_min,
            z_max,
        }
    }

    /// Width along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Width along y.
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Height along z.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// Uniform `X`, `Y`, `Z` parameter specs inside `extent`.
///
/// The z window starts `z_offset` above the model bottom and keeps the full
/// model height, so it may reach above `z_max` by `z_offset`.
#[must_use]
pub fn random_positions(extent: &Extent, z_offset: f64) -> [ParameterSpec; 3] {
    let z_low = extent.z_min + z_offset;

    [
        ParameterSpec::uniform(extent.x_min, extent.x_max),
        ParameterSpec::uniform(extent.y_min, extent.y_max),
        ParameterSpec::uniform(z_low, z_low + extent.height()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_sizes() {
        let extent = Extent::from_bounds([0.0, 1000.0, 0.0, 500.0, -200.0, 0.0]);
        assert_eq!(extent.width(), 1000.0);
        assert_eq!(extent.depth(), 500.0);
        assert_eq!(extent.height(), 200.0);
    }

    #[test]
    fn test_random_positions_cover_extent() {
        let extent = Extent::from_bounds([0.0, 1000.0, 10.0, 500.0, 0.0, 200.0]);
        let [x, y, z] = random_positions(&extent, 0.0);

        assert_eq!((x.low, x.high), (Some(0.0), Some(1000.0)));
        assert_eq!((y.low, y.high), (Some(10.0), Some(500.0)));
        assert_eq!((z.low, z.high), (Some(0.0), Some(200.0)));
        assert!(x.uncertain && y.uncertain && z.uncertain);
    }

    #[test]
    fn test_z_offset_shifts_window() {
        let extent = Extent::from_bounds([0.0, 1.0, 0.0, 1.0, 100.0, 300.0]);
        let [_, _, z] = random_positions(&extent, 50.0);

        assert_eq!(z.low, Some(150.0));
        assert_eq!(z.high, Some(350.0));
    }
}
