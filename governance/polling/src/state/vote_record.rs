//! Recorded vote of an account

use {
    crate::{
        error::PollingError,
        format::choice_ordinal,
        state::{enums::VotingMode, poll::Poll},
    },
    serde_derive::{Deserialize, Serialize},
};

/// Vote currently recorded for an account on a poll
/// An empty ranking or None option means the account is not voting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExistingVote {
    /// 1-based option positions in preference order
    Ranked(Vec<u16>),

    /// 0-based position of the option voted for
    SingleChoice(Option<u8>),
}

/// One line of a recorded ranking
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedChoice {
    /// Rank text, e.g. "1st choice"
    pub rank: String,

    /// Option label, None when the ranking points outside the option list
    pub label: Option<String>,
}

impl ExistingVote {
    /// Empty recorded vote for the poll's voting mode
    pub fn none(voting_mode: VotingMode) -> Self {
        match voting_mode {
            VotingMode::RankedChoiceIrv => ExistingVote::Ranked(vec![]),
            VotingMode::SingleChoice => ExistingVote::SingleChoice(None),
        }
    }

    /// Returns true if the account has a recorded vote
    pub fn is_voting(&self) -> bool {
        match self {
            ExistingVote::Ranked(ranking) => !ranking.is_empty(),
            ExistingVote::SingleChoice(option) => option.is_some(),
        }
    }

    /// Returns the voting mode the vote was recorded for
    pub fn voting_mode(&self) -> VotingMode {
        match self {
            ExistingVote::Ranked(_) => VotingMode::RankedChoiceIrv,
            ExistingVote::SingleChoice(_) => VotingMode::SingleChoice,
        }
    }

    /// 0-based position of the single-choice option voted for
    pub fn option_voting_for(&self) -> Option<u8> {
        match self {
            ExistingVote::SingleChoice(option) => *option,
            ExistingVote::Ranked(_) => None,
        }
    }

    /// Checks the vote can be withdrawn
    pub fn assert_can_withdraw(&self) -> Result<(), PollingError> {
        if !self.is_voting() {
            return Err(PollingError::NothingToWithdraw);
        }

        Ok(())
    }

    /// Resolves a recorded ranking into rank and label lines
    pub fn ranked_choices(&self, poll: &Poll) -> Vec<RankedChoice> {
        match self {
            ExistingVote::Ranked(ranking) => ranking
                .iter()
                .enumerate()
                .map(|(i, rank)| RankedChoice {
                    rank: format!("{} choice", choice_ordinal(i + 1)),
                    label: (*rank as usize)
                        .checked_sub(1)
                        .and_then(|index| poll.options.get(index))
                        .cloned(),
                })
                .collect(),
            ExistingVote::SingleChoice(_) => vec![],
        }
    }
}

/// Status line shown for the account's recorded vote
pub fn vote_status_text(poll: &Poll, vote: &ExistingVote) -> String {
    match vote {
        ExistingVote::SingleChoice(Some(position)) => {
            let label = poll
                .options
                .get(*position as usize)
                .map(String::as_str)
                .unwrap_or_default();
            if poll.active {
                format!("Currently voting: {}", label)
            } else {
                format!("Voted for: {}", label)
            }
        }
        ExistingVote::Ranked(ranking) if !ranking.is_empty() => {
            if poll.active {
                "Current Vote".to_string()
            } else {
                "Voted For".to_string()
            }
        }
        _ => {
            if poll.active {
                "Not currently voting".to_string()
            } else {
                "You did not vote".to_string()
            }
        }
    }
}
