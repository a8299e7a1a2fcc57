use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use crate::WeatherError;

/// Static record for one supported city: KMA grid cell and display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityEntry {
    pub key: &'static str,
    pub grid_x: u16,
    pub grid_y: u16,
    pub display_name: &'static str,
}

/// Supported cities (Gyeonggi-do).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityId {
    Ansan,
    Suwon,
    Seongnam,
    Goyang,
    Yongin,
    Bucheon,
    Anyang,
    Pyeongtaek,
}

static CITIES: [CityEntry; 8] = [
    CityEntry { key: "ansan", grid_x: 58, grid_y: 121, display_name: "안산시" },
    CityEntry { key: "suwon", grid_x: 60, grid_y: 121, display_name: "수원시" },
    CityEntry { key: "seongnam", grid_x: 63, grid_y: 124, display_name: "성남시" },
    CityEntry { key: "goyang", grid_x: 57, grid_y: 128, display_name: "고양시" },
    CityEntry { key: "yongin", grid_x: 64, grid_y: 119, display_name: "용인시" },
    CityEntry { key: "bucheon", grid_x: 57, grid_y: 125, display_name: "부천시" },
    CityEntry { key: "anyang", grid_x: 59, grid_y: 123, display_name: "안양시" },
    CityEntry { key: "pyeongtaek", grid_x: 62, grid_y: 114, display_name: "평택시" },
];

impl CityId {
    pub const fn all() -> &'static [CityId] {
        &[
            CityId::Ansan,
            CityId::Suwon,
            CityId::Seongnam,
            CityId::Goyang,
            CityId::Yongin,
            CityId::Bucheon,
            CityId::Anyang,
            CityId::Pyeongtaek,
        ]
    }

    pub fn entry(&self) -> &'static CityEntry {
        let idx = match self {
            CityId::Ansan => 0,
            CityId::Suwon => 1,
            CityId::Seongnam => 2,
            CityId::Goyang => 3,
            CityId::Yongin => 4,
            CityId::Bucheon => 5,
            CityId::Anyang => 6,
            CityId::Pyeongtaek => 7,
        };
        &CITIES[idx]
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().key
    }

    pub fn display_name(&self) -> &'static str {
        self.entry().display_name
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CityId {
    type Error = WeatherError;

    /// Accepts the ASCII key in any case, or the Korean display name.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::CityNotSelected);
        }

        let lower = trimmed.to_lowercase();
        CityId::all()
            .iter()
            .copied()
            .find(|id| id.as_str() == lower || id.display_name() == trimmed)
            .ok_or_else(|| WeatherError::UnknownCity(value.to_string()))
    }
}
