//! Analytics events emitted on ballot and vote actions
//!
//! Analytics is fire-and-forget: a failing sink is logged and never blocks the
//! action that produced the event.

use {
    crate::state::enums::EventKind,
    log::{info, warn},
    serde_derive::{Deserialize, Serialize},
    thiserror::Error,
};

/// Product label of the dashboard
pub const DEFAULT_PRODUCT: &str = "governance-dashboard";

/// Page label of the poll view
pub const DEFAULT_PAGE: &str = "Polling";

/// Section label of the voting panel
pub const DEFAULT_SECTION: &str = "voting-panel";

/// Event id of a ranked-choice slot selection
pub const SELECT_RANKED_CHOICE_ID: &str = "dropdown-select-ranked-choice";

/// Event id of a single-choice selection
pub const SELECT_ID: &str = "dropdown-select";

/// Event id of a vote submission
pub const VOTE_ID: &str = "vote";

/// Event id of a vote withdrawal
pub const WITHDRAW_ID: &str = "withdraw";

/// Structured analytics event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Interaction kind
    #[serde(rename = "eventKind")]
    pub event_kind: EventKind,

    /// Element the user interacted with
    pub id: String,

    /// Product label
    pub product: String,

    /// Page label
    pub page: String,

    /// Page section label
    pub section: String,
}

/// Labels attached to every event of a view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsContext {
    /// Product label
    pub product: String,

    /// Page label
    pub page: String,

    /// Page section label
    pub section: String,
}

impl Default for AnalyticsContext {
    fn default() -> Self {
        Self {
            product: DEFAULT_PRODUCT.to_string(),
            page: DEFAULT_PAGE.to_string(),
            section: DEFAULT_SECTION.to_string(),
        }
    }
}

impl AnalyticsContext {
    /// Builds an event of the given kind for the element id
    pub fn event(&self, event_kind: EventKind, id: &str) -> AnalyticsEvent {
        AnalyticsEvent {
            event_kind,
            id: id.to_string(),
            product: self.product.clone(),
            page: self.page.clone(),
            section: self.section.clone(),
        }
    }
}

/// Analytics sink failure
#[derive(Debug, Error)]
#[error("Analytics sink error: {0}")]
pub struct AnalyticsError(pub String);

/// Write-only destination of analytics events
pub trait AnalyticsSink {
    /// Records the event
    fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError>;
}

/// Sink writing events to the log as JSON lines
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAnalyticsSink;

impl AnalyticsSink for LogAnalyticsSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        let line = serde_json::to_string(event).map_err(|e| AnalyticsError(e.to_string()))?;
        info!(target: "analytics", "{}", line);
        Ok(())
    }
}

/// Records the event, logging and swallowing sink failures
pub fn emit(sink: &dyn AnalyticsSink, event: AnalyticsEvent) {
    if let Err(e) = sink.track(&event) {
        warn!("Dropped analytics event {}: {}", event.id, e);
    }
}
