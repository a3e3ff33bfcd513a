//! Error types

use {log::error, num_derive::FromPrimitive, num_traits::FromPrimitive, thiserror::Error};

/// Errors that may be returned by the polling dashboard core.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum PollingError {
    /// Slot index is out of range or is not the trailing, editable slot
    #[error("Invalid ballot slot")]
    InvalidSlot,

    /// Option is already ranked in another slot of the ballot
    #[error("Option is already ranked in another slot")]
    DuplicateSelection,

    /// No option is left to rank or the trailing slot is still empty
    #[error("Ballot cannot take another choice")]
    BallotFull,

    /// Ranked submission requested without any filled slot
    #[error("Ballot has no ranked choices")]
    EmptyBallot,

    /// Single-choice submission requested without a selection
    #[error("No option selected")]
    NoSelection,

    /// Tally or recorded vote requested before the provider resolved it
    #[error("Poll data is not loaded yet")]
    DataNotReady,

    /// Option position is outside the poll's option list
    #[error("Invalid poll option")]
    InvalidOption,

    /// Poll has more options than a vote payload can address
    #[error("Poll has too many options")]
    TooManyOptions,

    /// Tally does not carry exactly one entry per poll option
    #[error("Tally does not match poll options")]
    TallyMismatch,

    /// Operation is not supported by the poll's voting mode
    #[error("Operation does not match poll voting mode")]
    InvalidVotingMode,

    /// Poll is closed for voting
    #[error("Poll is not active")]
    PollNotActive,

    /// No account is connected
    #[error("No active account")]
    AccountRequired,

    /// Selection equals the vote already recorded for the account
    #[error("Selection matches the recorded vote")]
    UnchangedSelection,

    /// Account has no recorded vote to withdraw
    #[error("No recorded vote to withdraw")]
    NothingToWithdraw,

    /// Poll could not be resolved from its identifier or slug
    #[error("Poll not found")]
    PollNotFound,

    /// Poll snapshot could not be parsed
    #[error("Invalid poll snapshot")]
    InvalidSnapshot,

    /// Vote payload bytes could not be decoded
    #[error("Invalid instruction data")]
    InvalidInstruction,
}

impl PollingError {
    /// Numeric code of the error
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Decodes a numeric code back into the error
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }

    /// Writes the error message to the log
    pub fn print(&self) {
        error!("{}", self);
    }
}
