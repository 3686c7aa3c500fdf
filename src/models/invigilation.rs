// src/models/invigilation.rs

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub designation: String,
    pub specialization: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "First Shift")]
    First,
    #[serde(rename = "Second Shift")]
    Second,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvigilationAssignment {
    pub id: u32,
    pub faculty_id: String,
    pub faculty_name: String,
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub shift: Shift,
    pub room: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentPayload {
    #[validate(length(min = 1, message = "Faculty is required."))]
    pub faculty_id: String,
    // Aceita "2025-04-22" (input date) ou "22/04/2025"
    #[validate(length(min = 1, message = "Date is required."))]
    pub date: String,
    pub shift: Shift,
    #[validate(length(min = 1, message = "Room is required."))]
    pub room: String,
}

/// Horário de início de cada turno.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTimes {
    #[serde(with = "hh_mm")]
    pub first_slot_time: NaiveTime,
    #[serde(with = "hh_mm")]
    pub second_slot_time: NaiveTime,
}

impl Default for SlotTimes {
    fn default() -> Self {
        Self {
            first_slot_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            second_slot_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvigilationSchedule {
    pub slots: SlotTimes,
    pub assignments: Vec<InvigilationAssignment>,
    pub submitted: bool,
}

pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, INPUT_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT))
        .ok()
}

mod display_date {
    use chrono::NaiveDate;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(super::DISPLAY_DATE_FORMAT))
    }
}

mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}
