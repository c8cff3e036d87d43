// ── Geographic position ──

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A WGS84 coordinate pair.
///
/// Serialized as `[latitude, longitude]`, the shape the fixture uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    lat: f64,
    lon: f64,
}

impl Position {
    /// Build a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::ValidationFailed {
                message: format!("latitude {lat} outside -90..=90"),
            });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::ValidationFailed {
                message: format!("longitude {lon} outside -180..=180"),
            });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.lat, self.lon].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [lat, lon] = <[f64; 2]>::deserialize(deserializer)?;
        Self::new(lat, lon).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Position::new(52.5, 13.4).is_ok());
        assert!(Position::new(90.0, -180.0).is_ok());
        assert!(Position::new(91.0, 0.0).is_err());
        assert!(Position::new(0.0, 180.5).is_err());
        assert!(Position::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn serializes_as_lat_lon_pair() {
        let pos = Position::new(48.14, 11.56).expect("valid");
        assert_eq!(serde_json::to_string(&pos).expect("json"), "[48.14,11.56]");

        let back: Position = serde_json::from_str("[48.14,11.56]").expect("parse");
        assert_eq!(back, pos);
        assert!(serde_json::from_str::<Position>("[120.0,11.56]").is_err());
    }
}
