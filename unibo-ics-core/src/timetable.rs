//! Lesson timetable feed types.
//!
//! The feed is a JSON array of scheduled sessions. Timestamps carry second
//! precision and no timezone offset; they are kept naive end to end.

use serde::{Deserialize, Serialize};

use crate::website::CourseWebsiteId;

/// An ordered list of timetable events, as returned by the feed.
pub type Timetable = Vec<TimetableEvent>;

/// Serde adapter for the feed's offset-less timestamp format.
pub mod calendar_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    /// Wire format of feed timestamps.
    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}

/// A room assigned to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aula {
    #[serde(default)]
    pub des_risorsa: String,
}

/// One scheduled session of a course module.
///
/// Fields other than the timestamps may be absent in the feed and default to
/// empty; a malformed timestamp fails the decode of the whole feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEvent {
    /// Module code, part of the event identity
    #[serde(default)]
    pub cod_modulo: String,
    #[serde(default)]
    pub periodo_calendario: String,
    /// Splitting code when a module is taught in parallel groups
    #[serde(default)]
    pub cod_sdoppiamento: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "extCode")]
    pub ext_code: String,
    /// Teaching period label
    #[serde(default)]
    pub periodo: String,
    /// Instructor name
    #[serde(default)]
    pub docente: String,
    /// Credit value
    #[serde(default)]
    pub cfu: u32,
    /// Remote-delivery flag
    #[serde(default)]
    pub teledidattica: bool,
    /// Remote meeting link, present for remote sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<String>,
    #[serde(with = "calendar_time")]
    pub start: chrono::NaiveDateTime,
    #[serde(with = "calendar_time")]
    pub end: chrono::NaiveDateTime,
    #[serde(default)]
    pub aule: Vec<Aula>,
}

/// Build the timetable feed URL for a course website and year of study.
pub fn timetable_url(courses_base: &str, course: &CourseWebsiteId, anno: u32) -> String {
    format!(
        "{}/{}/{}/orario-lezioni/@@orario_reale_json?anno={}",
        courses_base, course.tipologia, course.id, anno
    )
}
