use serde::Serialize;

/// Observation category codes understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// `T1H`, air temperature in °C.
    Temperature,
    /// `REH`, relative humidity in %.
    Humidity,
    /// `WSD`, wind speed in m/s.
    WindSpeed,
    /// `RN1`, precipitation over the last hour in mm.
    Precipitation,
    /// `PTY`, precipitation type code.
    PrecipitationType,
}

impl Category {
    /// Returns `None` for codes this crate does not fold (e.g. `UUU`, `VEC`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "T1H" => Some(Category::Temperature),
            "REH" => Some(Category::Humidity),
            "WSD" => Some(Category::WindSpeed),
            "RN1" => Some(Category::Precipitation),
            "PTY" => Some(Category::PrecipitationType),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Category::Temperature => "T1H",
            Category::Humidity => "REH",
            Category::WindSpeed => "WSD",
            Category::Precipitation => "RN1",
            Category::PrecipitationType => "PTY",
        }
    }
}

/// Qualitative weather label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Clear,
    MostlyCloudy,
    Overcast,
    Rain,
    Snow,
    Shower,
}

impl Condition {
    /// Display label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "맑음",
            Condition::MostlyCloudy => "구름많음",
            Condition::Overcast => "흐림",
            Condition::Rain => "비",
            Condition::Snow => "눈",
            Condition::Shower => "소나기",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::MostlyCloudy => "⛅",
            Condition::Overcast => "☁️",
            Condition::Rain => "🌧️",
            Condition::Snow => "❄️",
            Condition::Shower => "🌦️",
        }
    }

    /// Background theme. Mostly-cloudy and overcast share one bucket.
    pub fn theme(&self) -> Theme {
        match self {
            Condition::Clear => Theme::Sunny,
            Condition::MostlyCloudy | Condition::Overcast => Theme::Cloudy,
            Condition::Rain => Theme::Rainy,
            Condition::Snow => Theme::Snowy,
            Condition::Shower => Theme::Shower,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Background theme selector handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Shower,
}

impl Theme {
    pub fn class_name(&self) -> &'static str {
        match self {
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Snowy => "snowy",
            Theme::Shower => "shower",
        }
    }
}

/// Typed observation fields folded from the raw item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObservationFields {
    pub temperature_c: Option<i32>,
    pub humidity_pct: Option<String>,
    pub wind_speed_ms: Option<String>,
    pub precipitation_mm: Option<String>,
    pub precipitation_type_code: Option<String>,
}

/// Fully derived snapshot, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherSnapshot {
    #[serde(flatten)]
    pub fields: ObservationFields,
    pub condition: Condition,
    pub icon: &'static str,
}
