//! Terminal presenter: the CLI side of the presentation sinks.

use gg_weather_core::{
    DisplayCard, Presenter, WeatherError, WeatherSnapshot, present::FALLBACK_ICON,
};
use tracing::debug;

const CITY_REQUIRED: &str = "도시를 선택해주세요.";
const FETCH_FAILED: &str = "날씨 정보를 가져오지 못했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug)]
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl Presenter for TerminalPresenter {
    fn show_loading(&mut self) {
        if !self.json {
            eprintln!("Loading...");
        }
    }

    fn hide_loading(&mut self) {}

    fn show_card(&mut self, card: &DisplayCard, snapshot: &WeatherSnapshot) {
        if self.json {
            let value = serde_json::json!({ "snapshot": snapshot, "card": card });
            match serde_json::to_string_pretty(&value) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("Failed to serialize snapshot: {err}"),
            }
            return;
        }

        print!("{}", format_card(card));
    }

    fn show_error(&mut self, error: &WeatherError) {
        // Detail goes to the log only.
        debug!(error = %error, "Rendering failure state");
        eprintln!("{FALLBACK_ICON}  {FETCH_FAILED}");
    }

    fn prompt_city_required(&mut self) {
        eprintln!("{CITY_REQUIRED}");
    }
}

pub fn format_card(card: &DisplayCard) -> String {
    format!(
        "{city}  {time}\n\
         {icon}  {temp}°C  {cond}\n\
         습도 {hum}   강수량 {rain}   풍속 {wind}   기압 {pres}\n",
        city = card.city_name,
        time = card.timestamp,
        icon = card.icon,
        temp = card.temperature,
        cond = card.condition,
        hum = card.humidity,
        rain = card.precipitation,
        wind = card.wind_speed,
        pres = card.pressure,
    )
}
