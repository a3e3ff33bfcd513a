//! State enumerations

use serde_derive::{Deserialize, Serialize};

/// Marker the poll sources put into the vote type text of ranked polls
pub const RANKED_CHOICE_IRV_MARKER: &str = "Ranked Choice IRV";

/// How votes are cast on a Poll
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingMode {
    /// One option per account, plurality of MKR support
    #[default]
    SingleChoice,

    /// Ordered preferences tallied with instant-runoff voting
    RankedChoiceIrv,
}

impl VotingMode {
    /// Resolves the voting mode from the poll's free-text vote type
    /// The text is inspected once when the Poll is loaded and never again
    pub fn from_vote_type(vote_type: &str) -> Self {
        if vote_type.contains(RANKED_CHOICE_IRV_MARKER) {
            VotingMode::RankedChoiceIrv
        } else {
            VotingMode::SingleChoice
        }
    }

    /// Returns true for ranked-choice polls
    pub fn is_ranked(&self) -> bool {
        *self == VotingMode::RankedChoiceIrv
    }
}

/// Kind of user interaction reported to the analytics sink
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A button was clicked
    #[serde(rename = "btn-click")]
    ButtonClick,

    /// An input value changed
    #[serde(rename = "input-change")]
    InputChange,
}

/// Progress of the request for the account's recorded vote
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchState {
    /// No request is needed, e.g. no account is connected
    #[default]
    Idle,

    /// A request was issued and has not completed yet
    Fetching,

    /// The last request completed
    Loaded,
}
