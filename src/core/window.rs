use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::dataset::TimeRange;
use crate::core::primitives::{datetime_to_unix_millis, unix_millis_to_datetime};
use crate::core::scale::{validate_scale, validate_viewport_width};
use crate::error::TimelineResult;

/// Date span currently visible through the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportWindow {
    pub scroll_start: DateTime<Utc>,
    pub scroll_end: DateTime<Utc>,
}

impl ViewportWindow {
    /// Derives the window from a scroll offset.
    ///
    /// `padding_px` is the content padding left of the range origin, so a
    /// scroll offset of zero starts slightly before `origin`. Offsets beyond
    /// the representable calendar saturate at its bounds.
    pub fn from_scroll(
        origin: DateTime<Utc>,
        scroll_px: f64,
        padding_px: f64,
        viewport_width_px: f64,
        ms_per_px: f64,
    ) -> TimelineResult<Self> {
        let width = validate_viewport_width(viewport_width_px)?;
        let ms_per_px = validate_scale(ms_per_px)?;
        let start_millis = datetime_to_unix_millis(origin) + (scroll_px - padding_px) * ms_per_px;
        let end_millis = start_millis + width * ms_per_px;
        Ok(Self {
            scroll_start: unix_millis_to_datetime(saturate_millis(start_millis))?,
            scroll_end: unix_millis_to_datetime(saturate_millis(end_millis))?,
        })
    }

    /// Intersection with `range`, or `None` when the window lies outside it.
    #[must_use]
    pub fn clamp_to(self, range: TimeRange) -> Option<TimeRange> {
        let start = self.scroll_start.max(range.earliest);
        let end = self.scroll_end.min(range.latest);
        TimeRange::new(start, end).ok()
    }
}

fn saturate_millis(millis: f64) -> f64 {
    let min = DateTime::<Utc>::MIN_UTC.timestamp_millis() as f64;
    let max = DateTime::<Utc>::MAX_UTC.timestamp_millis() as f64;
    millis.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::ViewportWindow;
    use crate::core::dataset::TimeRange;
    use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

    #[test]
    fn window_accounts_for_padding() {
        let origin = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let window =
            ViewportWindow::from_scroll(origin, 16.0, 16.0, 100.0, 1_000.0).expect("window");
        assert_eq!(window.scroll_start, origin);
        assert_eq!(window.scroll_end, origin + Duration::milliseconds(100_000));
    }

    #[test]
    fn far_scroll_saturates_and_misses_the_range() {
        let origin = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let window = ViewportWindow::from_scroll(origin, 1.0e12, 16.0, 500.0, 630_000_000.0)
            .expect("saturated window");
        assert_eq!(window.scroll_start, window.scroll_end);
        assert_eq!(window.scroll_end.year(), DateTime::<Utc>::MAX_UTC.year());
        let range = TimeRange::new(origin, origin + Duration::days(3_652)).expect("range");
        assert_eq!(window.clamp_to(range), None);
    }

    #[test]
    fn clamp_intersects_with_range() {
        let origin = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let window = ViewportWindow {
            scroll_start: origin - Duration::days(2),
            scroll_end: origin + Duration::days(2),
        };
        let range = TimeRange::new(origin, origin + Duration::days(10)).expect("range");
        let clamped = window.clamp_to(range).expect("overlap");
        assert_eq!(clamped.earliest, origin);
        assert_eq!(clamped.latest, origin + Duration::days(2));
    }

    #[test]
    fn disjoint_window_clamps_to_none() {
        let origin = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let window = ViewportWindow {
            scroll_start: origin + Duration::days(20),
            scroll_end: origin + Duration::days(30),
        };
        let range = TimeRange::new(origin, origin + Duration::days(10)).expect("range");
        assert_eq!(window.clamp_to(range), None);
    }
}
