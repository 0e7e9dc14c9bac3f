//! UTC calendar arithmetic and month-name lookup.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Locale used by the built-in month-name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalendarLocale {
    #[default]
    EnUs,
    EsEs,
    FrFr,
}

/// Verbosity of a month label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonthNameFormat {
    Long,
    Short,
    Narrow,
}

impl MonthNameFormat {
    pub const ALL: [Self; 3] = [Self::Long, Self::Short, Self::Narrow];
}

/// Source of the twelve ordered month names for a given format.
///
/// `CalendarLocale` implements it with static tables; hosts and tests can
/// supply their own implementation.
pub trait MonthNameLookup {
    fn month_names(&self, format: MonthNameFormat) -> [String; 12];
}

impl MonthNameLookup for CalendarLocale {
    fn month_names(&self, format: MonthNameFormat) -> [String; 12] {
        month_names(*self, format).map(str::to_owned)
    }
}

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

/// Number of days in `month` (1..=12) of `year`, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> TimelineResult<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Ok(31),
        4 | 6 | 9 | 11 => Ok(30),
        2 if is_leap_year(year) => Ok(29),
        2 => Ok(28),
        other => Err(TimelineError::InvalidData(format!(
            "month must be in 1..=12, got {other}"
        ))),
    }
}

#[must_use]
pub fn month_names(locale: CalendarLocale, format: MonthNameFormat) -> [&'static str; 12] {
    match (locale, format) {
        (CalendarLocale::EnUs, MonthNameFormat::Long) => [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        (CalendarLocale::EnUs, MonthNameFormat::Short) => [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ],
        (CalendarLocale::EsEs, MonthNameFormat::Long) => [
            "enero",
            "febrero",
            "marzo",
            "abril",
            "mayo",
            "junio",
            "julio",
            "agosto",
            "septiembre",
            "octubre",
            "noviembre",
            "diciembre",
        ],
        (CalendarLocale::EsEs, MonthNameFormat::Short) => [
            "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
        ],
        (CalendarLocale::EsEs, MonthNameFormat::Narrow) => {
            ["E", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"]
        }
        (CalendarLocale::FrFr, MonthNameFormat::Long) => [
            "janvier",
            "février",
            "mars",
            "avril",
            "mai",
            "juin",
            "juillet",
            "août",
            "septembre",
            "octobre",
            "novembre",
            "décembre",
        ],
        (CalendarLocale::FrFr, MonthNameFormat::Short) => [
            "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
            "nov.", "déc.",
        ],
        (CalendarLocale::EnUs | CalendarLocale::FrFr, MonthNameFormat::Narrow) => {
            ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"]
        }
    }
}
