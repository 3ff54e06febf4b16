use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinate reference system identifier.
///
/// Only the identifier is modelled here; actual reprojection is done by whoever interprets the
/// data (the raster decoder or the rendering engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Crs {
    /// Geographic longitude/latitude on WGS84, `EPSG:4326`. This is the display projection.
    Wgs84,
    /// Any other EPSG-registered system, e.g. a UTM zone.
    Epsg(u32),
}

impl Crs {
    /// EPSG code of the system.
    pub fn epsg_code(&self) -> u32 {
        match self {
            Crs::Wgs84 => 4326,
            Crs::Epsg(code) => *code,
        }
    }

    /// Whether coordinates in this system are longitude/latitude degrees.
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Wgs84)
    }
}

/// Error returned when a CRS identifier cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported CRS identifier '{0}', expected 'EPSG:<code>'")]
pub struct CrsParseError(String);

impl FromStr for Crs {
    type Err = CrsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .strip_prefix("EPSG:")
            .and_then(|code| code.parse::<u32>().ok())
            .ok_or_else(|| CrsParseError(s.to_owned()))?;

        Ok(match code {
            4326 => Crs::Wgs84,
            other => Crs::Epsg(other),
        })
    }
}

impl TryFrom<String> for Crs {
    type Error = CrsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Crs> for String {
    fn from(value: Crs) -> Self {
        value.to_string()
    }
}

impl Display for Crs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg_code())
    }
}
