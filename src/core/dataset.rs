use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// A single named, dated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    #[serde(deserialize_with = "deserialize_milestone_date")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Milestone {
    #[must_use]
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            date,
            description: None,
        }
    }

    /// Builds a milestone from an ISO-8601 date or date-time string.
    pub fn parse(name: impl Into<String>, date: &str) -> TimelineResult<Self> {
        Ok(Self::new(name, parse_milestone_date(date)?))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A named, thematically grouped collection of milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub name: String,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Period {
    #[must_use]
    pub fn new(name: impl Into<String>, milestones: Vec<Milestone>) -> Self {
        Self {
            name: name.into(),
            milestones,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Closed `[start, end]` interval covered by this period's milestones.
    pub fn span(&self) -> TimelineResult<TimeRange> {
        TimeRange::enclosing(self.milestones.iter().map(|m| m.date)).ok_or_else(|| {
            TimelineError::EmptyPeriod {
                name: self.name.clone(),
            }
        })
    }
}

/// Root value consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub isolated_milestones: Vec<Milestone>,
}

impl Dataset {
    #[must_use]
    pub fn new(periods: Vec<Period>, isolated_milestones: Vec<Milestone>) -> Self {
        Self {
            periods,
            isolated_milestones,
        }
    }

    /// Parses and validates a dataset JSON document.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let raw: RawDataset = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse dataset json: {e}"))
        })?;
        Self::try_from(raw)?.validate()
    }

    /// Rejects duplicate names inside a collection. Empty periods are not an
    /// ingestion error; the engine reports them as a degenerate state.
    pub fn validate(self) -> TimelineResult<Self> {
        let mut period_names = HashSet::with_capacity(self.periods.len());
        for period in &self.periods {
            if !period_names.insert(period.name.as_str()) {
                return Err(TimelineError::InvalidData(format!(
                    "duplicate period name `{}`",
                    period.name
                )));
            }
            ensure_unique_milestone_names(&period.milestones, &period.name)?;
        }
        ensure_unique_milestone_names(&self.isolated_milestones, "isolated milestones")?;
        Ok(self)
    }

    #[must_use]
    pub fn milestone_count(&self) -> usize {
        self.isolated_milestones.len()
            + self
                .periods
                .iter()
                .map(|period| period.milestones.len())
                .sum::<usize>()
    }

    pub fn all_milestones(&self) -> impl Iterator<Item = &Milestone> {
        self.isolated_milestones
            .iter()
            .chain(self.periods.iter().flat_map(|period| period.milestones.iter()))
    }

    /// Range over every milestone, or `EmptyDataset`.
    pub fn time_range(&self) -> TimelineResult<TimeRange> {
        TimeRange::from_dataset(self).ok_or(TimelineError::EmptyDataset)
    }

    #[must_use]
    pub fn empty_period_names(&self) -> Vec<String> {
        self.periods
            .iter()
            .filter(|period| period.milestones.is_empty())
            .map(|period| period.name.clone())
            .collect()
    }
}

/// Closed instant interval. `earliest <= latest` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub earliest: DateTime<Utc>,
    pub latest: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(earliest: DateTime<Utc>, latest: DateTime<Utc>) -> TimelineResult<Self> {
        if latest < earliest {
            return Err(TimelineError::InvalidData(
                "time range end must not precede its start".to_owned(),
            ));
        }
        Ok(Self { earliest, latest })
    }

    #[must_use]
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        Self::enclosing(dataset.all_milestones().map(|m| m.date))
    }

    #[must_use]
    pub fn enclosing(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Option<Self> {
        let mut dates = dates.into_iter();
        let first = dates.next()?;
        let (earliest, latest) = dates.fold((first, first), |(lo, hi), date| {
            (lo.min(date), hi.max(date))
        });
        Some(Self { earliest, latest })
    }

    #[must_use]
    pub fn span_millis(self) -> f64 {
        (self.latest - self.earliest).num_milliseconds() as f64
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.earliest == self.latest
    }

    #[must_use]
    pub fn contains(self, date: DateTime<Utc>) -> bool {
        self.earliest <= date && date <= self.latest
    }

    /// Closed-interval overlap: touching endpoints count.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        !(self.latest < other.earliest || other.latest < self.earliest)
    }
}

/// Parses a milestone date.
///
/// Accepts RFC 3339 (converted to UTC), naive date-times (read as UTC) and
/// plain `YYYY-MM-DD` dates (UTC midnight).
pub fn parse_milestone_date(value: &str) -> TimelineResult<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(day.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(TimelineError::InvalidDate {
        value: value.to_owned(),
    })
}

fn deserialize_milestone_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_milestone_date(&raw).map_err(serde::de::Error::custom)
}

/// Wire shape of a dataset document with dates left as strings, so a bad
/// date surfaces as [`TimelineError::InvalidDate`] instead of a serde message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    #[serde(default)]
    periods: Vec<RawPeriod>,
    #[serde(default)]
    isolated_milestones: Vec<RawMilestone>,
}

#[derive(Debug, Deserialize)]
struct RawPeriod {
    name: String,
    #[serde(default)]
    milestones: Vec<RawMilestone>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMilestone {
    name: String,
    date: String,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<RawMilestone> for Milestone {
    type Error = TimelineError;

    fn try_from(raw: RawMilestone) -> TimelineResult<Self> {
        Ok(Self {
            date: parse_milestone_date(&raw.date)?,
            name: raw.name,
            description: raw.description,
        })
    }
}

impl TryFrom<RawPeriod> for Period {
    type Error = TimelineError;

    fn try_from(raw: RawPeriod) -> TimelineResult<Self> {
        Ok(Self {
            name: raw.name,
            milestones: raw
                .milestones
                .into_iter()
                .map(Milestone::try_from)
                .collect::<TimelineResult<_>>()?,
            description: raw.description,
        })
    }
}

impl TryFrom<RawDataset> for Dataset {
    type Error = TimelineError;

    fn try_from(raw: RawDataset) -> TimelineResult<Self> {
        Ok(Self {
            periods: raw
                .periods
                .into_iter()
                .map(Period::try_from)
                .collect::<TimelineResult<_>>()?,
            isolated_milestones: raw
                .isolated_milestones
                .into_iter()
                .map(Milestone::try_from)
                .collect::<TimelineResult<_>>()?,
        })
    }
}

fn ensure_unique_milestone_names(milestones: &[Milestone], owner: &str) -> TimelineResult<()> {
    let mut names = HashSet::with_capacity(milestones.len());
    for milestone in milestones {
        if !names.insert(milestone.name.as_str()) {
            return Err(TimelineError::InvalidData(format!(
                "duplicate milestone name `{}` in {owner}",
                milestone.name
            )));
        }
    }
    Ok(())
}
