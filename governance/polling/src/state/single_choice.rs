//! Single-choice selection

use {
    crate::{
        error::PollingError,
        instruction::{withdraw_vote, PollingInstruction},
        state::poll::{AccountAddress, Poll, PollId, PollOption},
    },
    log::debug,
    rust_decimal::Decimal,
};

/// Pending selection of one account on a single-choice poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleChoiceSelection {
    poll_id: PollId,
    options: Vec<PollOption>,
    selected: Option<PollOption>,
}

impl SingleChoiceSelection {
    /// Creates an empty selection
    pub fn new(poll_id: PollId, options: Vec<PollOption>) -> Self {
        Self {
            poll_id,
            options,
            selected: None,
        }
    }

    /// Poll the selection is made on
    pub fn poll_id(&self) -> PollId {
        self.poll_id
    }

    /// Currently selected option
    pub fn selected(&self) -> Option<&PollOption> {
        self.selected.as_ref()
    }

    /// Selects the option at the given position, replacing any earlier selection
    pub fn select(&mut self, position: u8) -> Result<(), PollingError> {
        let option = self
            .options
            .iter()
            .find(|option| option.position == position)
            .cloned()
            .ok_or(PollingError::InvalidOption)?;

        debug!("Poll {}: option {} selected", self.poll_id, position);
        self.selected = Some(option);

        Ok(())
    }

    /// Returns true if the selection can be submitted as a vote
    /// Submitting the option the account already votes for is not allowed
    pub fn can_submit(
        &self,
        poll: &Poll,
        account: Option<&AccountAddress>,
        voting_for: Option<u8>,
    ) -> bool {
        self.assert_can_submit(poll, account, voting_for).is_ok()
    }

    /// Checks the selection can be submitted as a vote
    pub fn assert_can_submit(
        &self,
        poll: &Poll,
        account: Option<&AccountAddress>,
        voting_for: Option<u8>,
    ) -> Result<(), PollingError> {
        poll.assert_is_active()?;

        if account.is_none() {
            return Err(PollingError::AccountRequired);
        }

        let selected = self.selected.as_ref().ok_or(PollingError::NoSelection)?;

        if voting_for == Some(selected.position) {
            return Err(PollingError::UnchangedSelection);
        }

        Ok(())
    }

    /// Selected option to submit
    pub fn to_submission(&self) -> Result<PollOption, PollingError> {
        self.selected.clone().ok_or(PollingError::NoSelection)
    }

    /// Withdraw payload for the recorded option; the selection is left untouched
    pub fn withdraw(&self, voting_for: u8, total_votes: Option<Decimal>) -> PollingInstruction {
        withdraw_vote(self.poll_id, voting_for, total_votes)
    }
}
