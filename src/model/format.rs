//! Wire formats for calendar dates (`YYYY-MM-DD`) and times of day
//! (`HH:MM:SS`, 24-hour, zero-padded).

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer, de};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let well_formed = raw.len() == 10
        && raw
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(format!("'{raw}' is not a YYYY-MM-DD date"));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| format!("'{raw}' is not a valid date"))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    let well_formed = raw.len() == 8
        && raw
            .char_indices()
            .all(|(i, c)| if i == 2 || i == 5 { c == ':' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(format!("'{raw}' is not a HH:MM:SS time"));
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| format!("'{raw}' is not a valid time"))
}

/// `Option<NaiveTime>` as `"HH:MM:SS"` or `null`.
pub mod hms {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format(TIME_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse_time(&raw).map_err(de::Error::custom))
            .transpose()
    }
}

/// Strict `YYYY-MM-DD` for required dates in request bodies.
pub mod ymd {
    use super::*;

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).map_err(de::Error::custom)
    }
}

/// Strict `YYYY-MM-DD` for optional dates in bodies and query strings.
pub mod ymd_opt {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse_date(&raw).map_err(de::Error::custom))
            .transpose()
    }
}
