use serde::Serialize;

use crate::{
    CityId,
    model::{Condition, ObservationFields, WeatherSnapshot},
};

/// Glyph shown when there is no snapshot to take an icon from.
pub const FALLBACK_ICON: &str = "🌤️";

/// The service does not report pressure; the card shows a fixed value.
pub const PRESSURE_DISPLAY: &str = "1013hPa";

const PLACEHOLDER: &str = "--";

/// Priority order: precipitation type first, then temperature bands.
pub fn derive_condition(precipitation_type: Option<&str>, temperature_c: Option<i32>) -> Condition {
    match precipitation_type {
        Some("1" | "2") => Condition::Rain,
        Some("3") => Condition::Snow,
        Some("4") => Condition::Shower,
        _ => match temperature_c {
            Some(t) if t >= 25 => Condition::Clear,
            Some(t) if t >= 15 => Condition::MostlyCloudy,
            _ => Condition::Overcast,
        },
    }
}

impl From<ObservationFields> for WeatherSnapshot {
    fn from(fields: ObservationFields) -> Self {
        let condition =
            derive_condition(fields.precipitation_type_code.as_deref(), fields.temperature_c);

        Self { fields, condition, icon: condition.icon() }
    }
}

/// Strings for each sink of the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayCard {
    pub city_name: String,
    pub timestamp: String,
    pub temperature: String,
    pub icon: String,
    pub condition: String,
    pub humidity: String,
    pub precipitation: String,
    pub wind_speed: String,
    pub pressure: String,
    pub theme: String,
}

impl DisplayCard {
    pub fn new(city: CityId, snapshot: &WeatherSnapshot, timestamp: String) -> Self {
        let f = &snapshot.fields;

        Self {
            city_name: city.display_name().to_string(),
            timestamp,
            temperature: f
                .temperature_c
                .map(|t| t.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string()),
            icon: snapshot.icon.to_string(),
            condition: snapshot.condition.label().to_string(),
            humidity: format!("{}%", f.humidity_pct.as_deref().unwrap_or(PLACEHOLDER)),
            precipitation: format!("{}mm", f.precipitation_mm.as_deref().unwrap_or("0")),
            wind_speed: format!("{}m/s", f.wind_speed_ms.as_deref().unwrap_or(PLACEHOLDER)),
            pressure: PRESSURE_DISPLAY.to_string(),
            theme: snapshot.condition.theme().class_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::{RawObservationItem, fold_items};

    fn snapshot(items: &[(&str, &str)]) -> WeatherSnapshot {
        let raw: Vec<_> = items.iter().map(|(c, v)| RawObservationItem::new(*c, *v)).collect();
        WeatherSnapshot::from(fold_items(&raw))
    }

    #[test]
    fn precipitation_type_beats_temperature() {
        assert_eq!(derive_condition(Some("3"), Some(30)), Condition::Snow);
        assert_eq!(derive_condition(Some("1"), Some(30)), Condition::Rain);
        assert_eq!(derive_condition(Some("2"), Some(-5)), Condition::Rain);
        assert_eq!(derive_condition(Some("4"), None), Condition::Shower);
    }

    #[test]
    fn temperature_band_boundaries() {
        assert_eq!(derive_condition(None, Some(25)), Condition::Clear);
        assert_eq!(derive_condition(None, Some(24)), Condition::MostlyCloudy);
        assert_eq!(derive_condition(None, Some(15)), Condition::MostlyCloudy);
        assert_eq!(derive_condition(None, Some(14)), Condition::Overcast);
        assert_eq!(derive_condition(Some("0"), None), Condition::Overcast);
        assert_eq!(derive_condition(None, None), Condition::Overcast);
    }

    #[test]
    fn unknown_precipitation_codes_fall_back_to_temperature() {
        assert_eq!(derive_condition(Some("5"), Some(26)), Condition::Clear);
        assert_eq!(derive_condition(Some("7"), Some(10)), Condition::Overcast);
    }

    #[test]
    fn scenario_hot_and_dry() {
        let s = snapshot(&[("T1H", "26.3")]);
        assert_eq!(s.fields.temperature_c, Some(26));
        assert_eq!(s.condition, Condition::Clear);
        assert_eq!(s.icon, "☀️");
    }

    #[test]
    fn scenario_snowing() {
        let s = snapshot(&[("PTY", "3"), ("T1H", "5.0")]);
        assert_eq!(s.condition, Condition::Snow);
        assert_eq!(s.icon, "❄️");
        assert_eq!(s.fields.temperature_c, Some(5));
    }

    #[test]
    fn scenario_no_items() {
        let s = snapshot(&[]);
        assert_eq!(s.fields, ObservationFields::default());
        assert_eq!(s.condition, Condition::Overcast);
        assert_eq!(s.icon, "☁️");
    }

    #[test]
    fn card_uses_placeholders_for_missing_fields() {
        let card = DisplayCard::new(CityId::Anyang, &snapshot(&[]), "2024.07.15 14:30".into());
        assert_eq!(card.city_name, "안양시");
        assert_eq!(card.temperature, "--");
        assert_eq!(card.humidity, "--%");
        assert_eq!(card.precipitation, "0mm");
        assert_eq!(card.wind_speed, "--m/s");
        assert_eq!(card.pressure, "1013hPa");
        assert_eq!(card.condition, "흐림");
        assert_eq!(card.theme, "cloudy");
    }

    #[test]
    fn card_shows_zero_degrees() {
        let s = snapshot(&[("T1H", "0.2"), ("REH", "80"), ("RN1", "1.5"), ("WSD", "4.44")]);
        let card = DisplayCard::new(CityId::Bucheon, &s, "2024.01.02 06:00".into());
        assert_eq!(card.temperature, "0");
        assert_eq!(card.humidity, "80%");
        assert_eq!(card.precipitation, "1.5mm");
        assert_eq!(card.wind_speed, "4.4m/s");
        assert_eq!(card.icon, "☁️");
    }
}
