//! Forecasting and analytics engine.
//!
//! Everything in here is pure and synchronous: callers hand in the full batch
//! of readings for a request and get plain serializable results back. Data
//! flows filter → frame → {forecast, smoothing, analytics} → summary → global.

mod analytics;
mod forecast;
mod frame;
mod global;
mod smoothing;
mod stats;
mod summary;
mod timestamp;
mod window;

pub use analytics::{correlation, growth_rate, peak_hour};
pub use forecast::{predict_with_lr, trend_slope};
pub use frame::{FrameRow, LocationFrame};
pub use global::{global_summary, GlobalSummary};
pub use smoothing::{detect_anomalies, exponential_smoothing, DEFAULT_ALPHA};
pub use summary::{summarize_location, LocationSummary};
pub use timestamp::{normalize_timestamp, now_secs};
pub use window::{filter_by_time, TimeWindow};
