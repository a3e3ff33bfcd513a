//! Vote payloads handed to the vote action gateway

use {
    crate::{error::PollingError, state::poll::PollId},
    borsh::{BorshDeserialize, BorshSerialize},
    log::info,
    rust_decimal::Decimal,
    serde_json::{json, Value},
};

/// Vote actions supported by the vote action gateway
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum PollingInstruction {
    /// Casts or replaces the account's ranked-choice vote
    ///
    /// The ranking lists 0-based option positions, most preferred first
    CastRankedVote {
        /// Poll voted on
        poll_id: PollId,

        /// Option positions in preference order
        rankings: Vec<u8>,
    },

    /// Casts or replaces the account's single-choice vote
    CastVote {
        /// Poll voted on
        poll_id: PollId,

        /// 0-based position of the selected option
        selected_option_id: u8,

        /// MKR currently supporting the selected option, None when not loaded
        total_votes: Option<Decimal>,
    },

    /// Withdraws the account's ranked-choice vote
    WithdrawRankedVote {
        /// Poll the vote is withdrawn from
        poll_id: PollId,
    },

    /// Withdraws the account's single-choice vote
    WithdrawVote {
        /// Poll the vote is withdrawn from
        poll_id: PollId,

        /// 0-based position of the option currently voted for
        option_id: u8,

        /// MKR currently supporting the option, None when not loaded
        total_votes: Option<Decimal>,
    },
}

impl PollingInstruction {
    /// Poll the instruction applies to
    pub fn poll_id(&self) -> PollId {
        match self {
            PollingInstruction::CastRankedVote { poll_id, .. }
            | PollingInstruction::CastVote { poll_id, .. }
            | PollingInstruction::WithdrawRankedVote { poll_id }
            | PollingInstruction::WithdrawVote { poll_id, .. } => *poll_id,
        }
    }

    /// Returns true for withdraw actions
    pub fn is_withdraw(&self) -> bool {
        matches!(
            self,
            PollingInstruction::WithdrawRankedVote { .. } | PollingInstruction::WithdrawVote { .. }
        )
    }

    /// Serializes the instruction into gateway bytes
    pub fn pack(&self) -> Result<Vec<u8>, PollingError> {
        borsh::to_vec(self).map_err(|_| PollingError::InvalidInstruction)
    }

    /// Deserializes gateway bytes
    pub fn unpack(input: &[u8]) -> Result<Self, PollingError> {
        Self::try_from_slice(input).map_err(|_| PollingError::InvalidInstruction)
    }

    /// JSON payload in the shape the gateway's transaction modal expects
    pub fn to_json(&self) -> Value {
        match self {
            PollingInstruction::CastRankedVote { poll_id, rankings } => json!({
                "pollId": poll_id,
                "rankings": rankings,
            }),
            PollingInstruction::CastVote {
                poll_id,
                selected_option_id,
                total_votes,
            } => json!({
                "pollId": poll_id,
                "selectedOptionId": selected_option_id,
                "totalVotes": total_votes,
            }),
            PollingInstruction::WithdrawRankedVote { poll_id } => json!({
                "pollId": poll_id,
                "withdraw": true,
            }),
            PollingInstruction::WithdrawVote {
                poll_id,
                option_id,
                total_votes,
            } => json!({
                "pollId": poll_id,
                "withdraw": true,
                "selectedOptionId": option_id,
                "totalVotes": total_votes,
            }),
        }
    }
}

/// Creates CastRankedVote instruction
pub fn cast_ranked_vote(poll_id: PollId, rankings: Vec<u8>) -> PollingInstruction {
    info!("Poll {}: ranked vote {:?}", poll_id, rankings);
    PollingInstruction::CastRankedVote { poll_id, rankings }
}

/// Creates CastVote instruction
pub fn cast_vote(
    poll_id: PollId,
    selected_option_id: u8,
    total_votes: Option<Decimal>,
) -> PollingInstruction {
    info!("Poll {}: vote for option {}", poll_id, selected_option_id);
    PollingInstruction::CastVote {
        poll_id,
        selected_option_id,
        total_votes,
    }
}

/// Creates WithdrawRankedVote instruction
pub fn withdraw_ranked_vote(poll_id: PollId) -> PollingInstruction {
    info!("Poll {}: withdraw ranked vote", poll_id);
    PollingInstruction::WithdrawRankedVote { poll_id }
}

/// Creates WithdrawVote instruction
pub fn withdraw_vote(
    poll_id: PollId,
    option_id: u8,
    total_votes: Option<Decimal>,
) -> PollingInstruction {
    info!("Poll {}: withdraw vote for option {}", poll_id, option_id);
    PollingInstruction::WithdrawVote {
        poll_id,
        option_id,
        total_votes,
    }
}
