pub mod calendar;
pub mod dataset;
pub mod primitives;
pub mod scale;
pub mod window;

pub use calendar::{
    CalendarLocale, MonthNameFormat, MonthNameLookup, days_in_month, is_leap_year, month_names,
};
pub use dataset::{Dataset, Milestone, Period, TimeRange, parse_milestone_date};
pub use scale::{
    BaseScaleSource, ScaleState, TimeScale, ZoomRecenter, ZoomWarp, base_scale,
    content_width_px, effective_scale,
};
pub use window::ViewportWindow;
