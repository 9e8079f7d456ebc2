//! Analytics query window
//!
//! The window starts on the publication date and ends on the evaluation date
//! or the day before it, depending on [`WindowPolicy`]. The end is never
//! earlier than the start, so a video published today gets a one-day window.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::AnalysisWindow;

/// Where the window ends relative to the evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// End yesterday; the analytics service under-reports same-day ranges
    #[default]
    ShiftToYesterday,
    /// End today and rely on the early-stage ratio alone to detect lag
    ThroughToday,
}

/// Compute the window for a publication date evaluated on `today`
pub fn compute_window(
    publication_date: NaiveDate,
    today: NaiveDate,
    policy: WindowPolicy,
) -> AnalysisWindow {
    let end_date = match policy {
        WindowPolicy::ShiftToYesterday => today.pred_opt().unwrap_or(today),
        WindowPolicy::ThroughToday => today,
    };

    AnalysisWindow {
        start_date: publication_date,
        end_date: end_date.max(publication_date),
    }
}

/// Binds a policy to the time zone that defines "today"
#[derive(Debug, Clone, Copy)]
pub struct WindowCalculator {
    policy: WindowPolicy,
    timezone: Tz,
}

impl WindowCalculator {
    pub fn new(policy: WindowPolicy, timezone: Tz) -> Self {
        Self { policy, timezone }
    }

    /// Evaluation date for `now` in the configured zone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    pub fn window_for(&self, publication_date: NaiveDate, now: DateTime<Utc>) -> AnalysisWindow {
        compute_window(publication_date, self.today(now), self.policy)
    }
}

impl Default for WindowCalculator {
    fn default() -> Self {
        Self::new(WindowPolicy::default(), chrono_tz::UTC)
    }
}
