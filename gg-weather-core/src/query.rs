use chrono::{DateTime, TimeZone};

use crate::CityId;

pub const DEFAULT_PAGE_NO: u32 = 1;
pub const DEFAULT_NUM_OF_ROWS: u32 = 1000;

/// Response format requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Json,
    Xml,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Json => "JSON",
            DataType::Xml => "XML",
        }
    }
}

/// Query parameters for one nowcast observation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    pub service_key: String,
    pub page_no: u32,
    pub num_of_rows: u32,
    pub data_type: DataType,
    /// `YYYYMMDD`
    pub base_date: String,
    /// `HHMM`
    pub base_time: String,
    pub nx: u16,
    pub ny: u16,
}

impl ObservationQuery {
    /// Builds the query for `city` at the wall-clock moment `now`, read in
    /// the moment's own time zone.
    pub fn build<Tz>(service_key: &str, city: CityId, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let entry = city.entry();

        Self {
            service_key: service_key.to_string(),
            page_no: DEFAULT_PAGE_NO,
            num_of_rows: DEFAULT_NUM_OF_ROWS,
            data_type: DataType::Json,
            base_date: now.format("%Y%m%d").to_string(),
            base_time: now.format("%H%M").to_string(),
            nx: entry.grid_x,
            ny: entry.grid_y,
        }
    }

    /// Query string pairs in the order the service documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("serviceKey", self.service_key.clone()),
            ("pageNo", self.page_no.to_string()),
            ("numOfRows", self.num_of_rows.to_string()),
            ("dataType", self.data_type.as_str().to_string()),
            ("base_date", self.base_date.clone()),
            ("base_time", self.base_time.clone()),
            ("nx", self.nx.to_string()),
            ("ny", self.ny.to_string()),
        ]
    }
}

/// `YYYY.MM.DD HH:MM`, as shown next to the city name.
pub fn display_timestamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y.%m.%d %H:%M").to_string()
}
