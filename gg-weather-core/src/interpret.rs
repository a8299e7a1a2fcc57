//! Decoding of the nowcast response envelope and folding of the flat
//! category/value item list into [`ObservationFields`].

use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{Category, ObservationFields},
};

/// Result code the service uses for a successful call.
pub const SUCCESS_CODE: &str = "00";

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope {
    pub response: ApiResponse,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub header: ApiHeader,
    #[serde(default)]
    pub body: Option<ApiBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHeader {
    pub result_code: String,
    #[serde(default)]
    pub result_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiBody {
    // The service sends `"items": ""` when a page has no rows.
    #[serde(default, deserialize_with = "items_or_empty")]
    pub items: ApiItems,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiItems {
    #[serde(default)]
    pub item: Vec<RawObservationItem>,
}

/// One category/value pair. Other fields (`baseDate`, `nx`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObservationItem {
    pub category: String,
    pub obsr_value: String,
}

impl RawObservationItem {
    pub fn new(category: impl Into<String>, obsr_value: impl Into<String>) -> Self {
        Self { category: category.into(), obsr_value: obsr_value.into() }
    }
}

fn items_or_empty<'de, D>(deserializer: D) -> Result<ApiItems, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ItemsOrString {
        Items(ApiItems),
        #[allow(dead_code)]
        Empty(String),
    }

    match ItemsOrString::deserialize(deserializer)? {
        ItemsOrString::Items(items) => Ok(items),
        ItemsOrString::Empty(_) => Ok(ApiItems::default()),
    }
}

/// Decodes a response body. Anything that is not the expected JSON shape is
/// a [`WeatherError::Decode`].
pub fn decode_envelope(body: &str) -> Result<ApiEnvelope, WeatherError> {
    Ok(serde_json::from_str(body)?)
}

/// Checks the result code and folds the item list.
pub fn interpret(envelope: ApiEnvelope) -> Result<ObservationFields, WeatherError> {
    let ApiResponse { header, body } = envelope.response;

    if header.result_code != SUCCESS_CODE {
        return Err(WeatherError::ApiResponse {
            code: header.result_code,
            message: header.result_msg.unwrap_or_default(),
        });
    }

    let items = body.map(|b| b.items.item).unwrap_or_default();
    debug!(count = items.len(), "Folding observation items");

    Ok(fold_items(&items))
}

/// Folds items in input order; a later item of the same category replaces
/// the earlier one. Unknown categories are skipped.
pub fn fold_items(items: &[RawObservationItem]) -> ObservationFields {
    items.iter().fold(ObservationFields::default(), |mut fields, item| {
        let Some(category) = Category::from_code(&item.category) else {
            return fields;
        };
        let value = item.obsr_value.trim();

        match category {
            Category::Temperature => match parse_finite(value) {
                Some(v) => fields.temperature_c = Some(round_half_up(v)),
                None => warn!(category = category.code(), value, "Non-numeric observation value"),
            },
            Category::Humidity => fields.humidity_pct = Some(value.to_string()),
            Category::WindSpeed => match parse_finite(value) {
                Some(v) => fields.wind_speed_ms = Some(format!("{v:.1}")),
                None => warn!(category = category.code(), value, "Non-numeric observation value"),
            },
            Category::Precipitation => fields.precipitation_mm = Some(value.to_string()),
            Category::PrecipitationType => fields.precipitation_type_code = Some(value.to_string()),
        }

        fields
    })
}

/// `f64::from_str` also accepts "NaN" and "inf"; only finite readings count.
fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds to the nearest integer with halves going toward positive infinity
/// (-2.5 -> -2, 2.5 -> 3).
fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
