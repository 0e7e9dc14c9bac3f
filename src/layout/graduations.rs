//! Adaptive calendar ticks for the time axis.
//!
//! The generator walks the visible days in UTC and decides, per day, whether
//! a tick is legible at the current scale. Year boundaries are always ticked;
//! month and day ticks appear once their reference widths cross the
//! configured thresholds, so zooming in only ever adds finer ticks.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::calendar::{MonthNameFormat, MonthNameLookup, days_in_month};
use crate::core::primitives::{MILLIS_PER_DAY, day_start_millis};
use crate::core::{CalendarLocale, TimeRange, TimeScale};
use crate::error::{TimelineError, TimelineResult};

const DAYS_PER_REFERENCE_YEAR: i64 = 365;
// The month reference is February 1970, the shortest month.
const REFERENCE_MONTH_YEAR: i32 = 1970;
const REFERENCE_MONTH: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraduationConfig {
    pub year_label_min_px: f64,
    pub month_tick_min_px: f64,
    pub month_label_min_px: f64,
    pub month_short_label_min_px: f64,
    pub month_long_label_min_px: f64,
    pub day_tick_min_px: f64,
    pub day_label_min_px: f64,
    pub locale: CalendarLocale,
}

impl Default for GraduationConfig {
    fn default() -> Self {
        Self {
            year_label_min_px: 48.0,
            month_tick_min_px: 16.0,
            month_label_min_px: 24.0,
            month_short_label_min_px: 48.0,
            month_long_label_min_px: 88.0,
            day_tick_min_px: 16.0,
            day_label_min_px: 32.0,
            locale: CalendarLocale::EnUs,
        }
    }
}

impl GraduationConfig {
    pub fn validate(self) -> TimelineResult<Self> {
        for (value, name) in [
            (self.year_label_min_px, "year_label_min_px"),
            (self.month_tick_min_px, "month_tick_min_px"),
            (self.month_label_min_px, "month_label_min_px"),
            (self.month_short_label_min_px, "month_short_label_min_px"),
            (self.month_long_label_min_px, "month_long_label_min_px"),
            (self.day_tick_min_px, "day_tick_min_px"),
            (self.day_label_min_px, "day_label_min_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TimelineError::InvalidData(format!(
                    "graduation config `{name}` must be finite and >= 0"
                )));
            }
        }
        if self.month_short_label_min_px > self.month_long_label_min_px {
            return Err(TimelineError::InvalidData(
                "graduation config short month threshold must not exceed the long one".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GraduationTier {
    Decade,
    Year,
    Month,
    Day,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraduationLabel {
    Year {
        year: i32,
        decade: bool,
    },
    Month {
        /// 1..=12
        month: u32,
        format: MonthNameFormat,
        text: String,
    },
    Day {
        day: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graduation {
    pub date: NaiveDate,
    pub x_px: f64,
    pub tier: GraduationTier,
    pub labels: SmallVec<[GraduationLabel; 3]>,
}

/// Pixel widths of one reference year, month and day at a given scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceWidths {
    pub year_px: f64,
    pub month_px: f64,
    pub day_px: f64,
}

impl ReferenceWidths {
    pub fn at(scale: TimeScale) -> TimelineResult<Self> {
        let month_days = days_in_month(REFERENCE_MONTH_YEAR, REFERENCE_MONTH)?;
        Ok(Self {
            year_px: scale.span_to_pixels((DAYS_PER_REFERENCE_YEAR * MILLIS_PER_DAY) as f64),
            month_px: scale.span_to_pixels((i64::from(month_days) * MILLIS_PER_DAY) as f64),
            day_px: scale.span_to_pixels(MILLIS_PER_DAY as f64),
        })
    }
}

/// Emits graduations for every legible day in `window`.
///
/// `window` is expected to be already intersected with the dataset range;
/// walking starts at the UTC day containing `window.earliest` and stops after
/// the last day starting at or before `window.latest`.
pub fn generate_graduations(
    window: TimeRange,
    scale: TimeScale,
    config: GraduationConfig,
    month_names: &dyn MonthNameLookup,
) -> TimelineResult<Vec<Graduation>> {
    let config = config.validate()?;
    let widths = ReferenceWidths::at(scale)?;
    let names = MonthNameTables::load(month_names);
    let end_millis = window.latest.timestamp_millis() as f64;

    let mut graduations = Vec::new();
    let mut day = window.earliest.date_naive();
    while day_start_millis(day) <= end_millis {
        if let Some(graduation) = classify_day(day, scale, widths, config, &names) {
            graduations.push(graduation);
        }
        let Some(next) = next_candidate_day(day, widths, config) else {
            break;
        };
        day = next;
    }

    Ok(graduations)
}

fn classify_day(
    day: NaiveDate,
    scale: TimeScale,
    widths: ReferenceWidths,
    config: GraduationConfig,
    names: &MonthNameTables,
) -> Option<Graduation> {
    let mut labels = SmallVec::new();
    let tier = if day.month() == 1 && day.day() == 1 {
        let decade = day.year().rem_euclid(10) == 0;
        if widths.year_px > config.year_label_min_px || decade {
            labels.push(GraduationLabel::Year {
                year: day.year(),
                decade,
            });
        }
        push_month_label(&mut labels, day, widths, config, names);
        push_day_label(&mut labels, day, widths, config);
        if decade {
            GraduationTier::Decade
        } else {
            GraduationTier::Year
        }
    } else if day.day() == 1 && widths.month_px > config.month_tick_min_px {
        push_month_label(&mut labels, day, widths, config, names);
        push_day_label(&mut labels, day, widths, config);
        GraduationTier::Month
    } else if widths.day_px > config.day_tick_min_px {
        push_day_label(&mut labels, day, widths, config);
        GraduationTier::Day
    } else {
        return None;
    };

    Some(Graduation {
        date: day,
        x_px: scale.millis_to_pixel(day_start_millis(day)),
        tier,
        labels,
    })
}

fn push_month_label(
    labels: &mut SmallVec<[GraduationLabel; 3]>,
    day: NaiveDate,
    widths: ReferenceWidths,
    config: GraduationConfig,
    names: &MonthNameTables,
) {
    if widths.month_px <= config.month_label_min_px {
        return;
    }
    let format = if widths.month_px > config.month_long_label_min_px {
        MonthNameFormat::Long
    } else if widths.month_px > config.month_short_label_min_px {
        MonthNameFormat::Short
    } else {
        MonthNameFormat::Narrow
    };
    labels.push(GraduationLabel::Month {
        month: day.month(),
        format,
        text: names.name(format, day.month0()).to_owned(),
    });
}

fn push_day_label(
    labels: &mut SmallVec<[GraduationLabel; 3]>,
    day: NaiveDate,
    widths: ReferenceWidths,
    config: GraduationConfig,
) {
    if widths.day_px > config.day_label_min_px {
        labels.push(GraduationLabel::Day { day: day.day() });
    }
}

/// Next day that can carry a tick. Days that could never be ticked at this
/// scale are skipped without being visited.
fn next_candidate_day(
    day: NaiveDate,
    widths: ReferenceWidths,
    config: GraduationConfig,
) -> Option<NaiveDate> {
    if widths.day_px > config.day_tick_min_px {
        return day.succ_opt();
    }
    if widths.month_px > config.month_tick_min_px {
        let (year, month) = if day.month() == 12 {
            (day.year() + 1, 1)
        } else {
            (day.year(), day.month() + 1)
        };
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
}

struct MonthNameTables {
    long: [String; 12],
    short: [String; 12],
    narrow: [String; 12],
}

impl MonthNameTables {
    fn load(lookup: &dyn MonthNameLookup) -> Self {
        Self {
            long: lookup.month_names(MonthNameFormat::Long),
            short: lookup.month_names(MonthNameFormat::Short),
            narrow: lookup.month_names(MonthNameFormat::Narrow),
        }
    }

    fn name(&self, format: MonthNameFormat, month0: u32) -> &str {
        let table = match format {
            MonthNameFormat::Long => &self.long,
            MonthNameFormat::Short => &self.short,
            MonthNameFormat::Narrow => &self.narrow,
        };
        &table[month0 as usize]
    }
}
