use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::geometry::BoardGeometry};

/// Tunable parameters of a match.
///
/// Every field has a default matching the classic layout: a 41-column board
/// (two halves of 19 playable columns plus the wall and the outer edges), 9
/// playable rows, 750 ms between automatic falls at the start, shrinking by
/// 10% per cleared column down to 250 ms, and 50 points per column.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// config file only needs to name what it changes.
///
/// # Example
///
/// ```
/// use splitwall_engine::MatchConfig;
///
/// let config: MatchConfig = serde_json::from_str(r#"{ "half_width": 8 }"#).unwrap();
/// assert_eq!(config.half_width, 8);
/// assert_eq!(config.points_per_column, 50);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Columns from the centre to either outer edge (`W`).
    pub half_width: i32,
    /// Rows including the implicit top and bottom walls (`H`).
    pub height: i32,
    /// y coordinate of the bottom wall row.
    pub bottom_row: i32,
    /// Time between automatic falls at the start of a match.
    #[serde(with = "super::serde_duration", rename = "initial_fall_interval_ms")]
    pub initial_fall_interval: Duration,
    /// Lower bound for the time between automatic falls.
    #[serde(with = "super::serde_duration", rename = "min_fall_interval_ms")]
    pub min_fall_interval: Duration,
    /// Factor applied to the fall interval on every wall shift.
    pub speed_factor: f64,
    /// Points awarded per cleared column.
    pub points_per_column: u64,
    /// Distance from the outer edge at which new pieces appear.
    pub spawn_inset: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            half_width: 20,
            height: 11,
            bottom_row: -7,
            initial_fall_interval: Duration::from_millis(750),
            min_fall_interval: Duration::from_millis(250),
            speed_factor: 0.9,
            points_per_column: 50,
            spawn_inset: 3,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.half_width < BoardGeometry::MIN_HALF_WIDTH {
            return Err(ConfigError::HalfWidthTooSmall(self.half_width));
        }
        if self.half_width > BoardGeometry::MAX_HALF_WIDTH {
            return Err(ConfigError::HalfWidthTooLarge(self.half_width));
        }
        if self.height < BoardGeometry::MIN_HEIGHT {
            return Err(ConfigError::HeightTooSmall(self.height));
        }
        if self.height > BoardGeometry::MAX_HEIGHT {
            return Err(ConfigError::HeightTooLarge(self.height));
        }
        if !(-BoardGeometry::MAX_BOTTOM_ROW..=BoardGeometry::MAX_BOTTOM_ROW)
            .contains(&self.bottom_row)
        {
            return Err(ConfigError::BottomRowOutOfRange(self.bottom_row));
        }
        if self.min_fall_interval.is_zero() || self.min_fall_interval > self.initial_fall_interval
        {
            return Err(ConfigError::InvalidFallInterval);
        }
        if !(self.speed_factor > 0.0 && self.speed_factor <= 1.0) {
            return Err(ConfigError::InvalidSpeedFactor(self.speed_factor));
        }
        if self.spawn_inset < 1 || self.spawn_inset >= self.half_width {
            return Err(ConfigError::InvalidSpawnInset(self.spawn_inset));
        }
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the dimensions have not passed [`Self::validate`].
    #[must_use]
    pub fn geometry(&self) -> BoardGeometry {
        BoardGeometry::new(self.half_width, self.height, self.bottom_row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MatchConfig::default();
        config.validate().unwrap();
        let geometry = config.geometry();
        assert_eq!(geometry.interior_rows(), -6..3);
        assert_eq!(geometry.inner_columns(), -19..20);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let base = MatchConfig::default();

        let config = MatchConfig {
            half_width: 1,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HalfWidthTooSmall(1))
        ));

        let config = MatchConfig {
            height: 2,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HeightTooSmall(2))
        ));

        let config = MatchConfig {
            min_fall_interval: Duration::from_secs(1),
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidFallInterval)
        ));

        let config = MatchConfig {
            speed_factor: 1.5,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeedFactor(_))
        ));

        let config = MatchConfig {
            spawn_inset: 20,
            ..base
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpawnInset(20))
        ));
    }

    #[test]
    fn test_rejects_oversized_board() {
        let base = MatchConfig::default();

        let config = MatchConfig {
            half_width: 2_000_000_000,
            spawn_inset: 3,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HalfWidthTooLarge(2_000_000_000))
        ));

        let config = MatchConfig {
            height: i32::MAX,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HeightTooLarge(i32::MAX))
        ));

        let config = MatchConfig {
            bottom_row: i32::MIN,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BottomRowOutOfRange(i32::MIN))
        ));

        let config = MatchConfig {
            half_width: BoardGeometry::MAX_HALF_WIDTH,
            height: BoardGeometry::MAX_HEIGHT,
            bottom_row: -BoardGeometry::MAX_BOTTOM_ROW,
            ..base
        };
        config.validate().unwrap();
        let geometry = config.geometry();
        assert_eq!(geometry.storage_width(), 2049);
    }

    #[test]
    fn test_json_uses_milliseconds() {
        let json = serde_json::to_value(MatchConfig::default()).unwrap();
        assert_eq!(json["initial_fall_interval_ms"], 750);
        assert_eq!(json["min_fall_interval_ms"], 250);

        let config: MatchConfig =
            serde_json::from_str(r#"{ "initial_fall_interval_ms": 500 }"#).unwrap();
        assert_eq!(config.initial_fall_interval, Duration::from_millis(500));
        assert_eq!(config.height, 11);
    }
}
