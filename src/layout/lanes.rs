use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Period, TimeRange};
use crate::error::{TimelineError, TimelineResult};

/// Period name -> lane (1-based), in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneAssignment {
    lanes: IndexMap<String, usize>,
}

impl LaneAssignment {
    #[must_use]
    pub fn lane(&self, period_name: &str) -> Option<usize> {
        self.lanes.get(period_name).copied()
    }

    /// Highest lane in use; `0` when no period was assigned.
    #[must_use]
    pub fn lane_count(&self) -> usize {
        self.lanes.values().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.lanes.iter().map(|(name, lane)| (name.as_str(), *lane))
    }
}

/// Greedy interval coloring in input order.
///
/// Each period takes the lowest lane not used by an earlier period whose
/// closed span overlaps its own. Lane count is not minimized; a period's lane
/// only depends on the periods listed before it.
pub fn assign_period_lanes<'a, I>(periods: I) -> TimelineResult<LaneAssignment>
where
    I: IntoIterator<Item = &'a Period>,
{
    let periods = periods.into_iter();
    let capacity = periods.size_hint().0;
    let mut placed: Vec<(TimeRange, usize)> = Vec::with_capacity(capacity);
    let mut lanes = IndexMap::with_capacity(capacity);

    for period in periods {
        let span = period.span()?;
        let mut taken: SmallVec<[usize; 8]> = placed
            .iter()
            .filter(|(other, _)| span.overlaps(*other))
            .map(|(_, lane)| *lane)
            .collect();
        taken.sort_unstable();
        taken.dedup();

        let mut lane = 1;
        for used in taken {
            if used == lane {
                lane += 1;
            } else if used > lane {
                break;
            }
        }

        if lanes.insert(period.name.clone(), lane).is_some() {
            return Err(TimelineError::InvalidData(format!(
                "duplicate period name `{}`",
                period.name
            )));
        }
        placed.push((span, lane));
    }

    Ok(LaneAssignment { lanes })
}
