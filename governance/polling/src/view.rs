//! Poll view session
//!
//! A `PollView` owns one poll, the active account and that account's voting
//! panel. The panel is built fresh whenever the account or the poll identity
//! changes and is never shared between views. The recorded vote of the account
//! is fetched asynchronously by the caller: identity changes hand out a
//! `FetchRequest`, and only the result of the latest request is applied.

use {
    crate::{
        analytics::{
            emit, AnalyticsContext, AnalyticsSink, LogAnalyticsSink, SELECT_ID,
            SELECT_RANKED_CHOICE_ID, VOTE_ID, WITHDRAW_ID,
        },
        error::PollingError,
        format::{
            cut_middle, format_date, participation_text, time_left, time_left_title,
            total_votes_text,
        },
        instruction::{cast_ranked_vote, cast_vote, PollingInstruction},
        state::{
            ballot::Ballot,
            enums::{EventKind, FetchState, VotingMode},
            poll::{AccountAddress, Poll, PollId},
            single_choice::SingleChoiceSelection,
            vote_record::{vote_status_text, ExistingVote},
        },
        tally::{RunoffBanner, VoteBreakdown},
    },
    chrono::{DateTime, FixedOffset, Utc},
    log::{debug, warn},
};

/// Request to fetch the recorded vote of an account on a poll
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    /// Account the vote is fetched for
    pub account: AccountAddress,

    /// Poll the vote is fetched for
    pub poll_id: PollId,
}

/// In-progress vote of the active account
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VotingPanel {
    /// Ranked-choice ballot
    Ranked(Ballot),

    /// Single-choice selection
    SingleChoice(SingleChoiceSelection),
}

impl VotingPanel {
    /// Fresh panel in the shape of the poll's voting mode
    pub fn new(poll: &Poll) -> Self {
        match poll.voting_mode {
            VotingMode::RankedChoiceIrv => {
                VotingPanel::Ranked(Ballot::new(poll.poll_id, poll.options()))
            }
            VotingMode::SingleChoice => VotingPanel::SingleChoice(SingleChoiceSelection::new(
                poll.poll_id,
                poll.options(),
            )),
        }
    }
}

/// Read model of the poll detail and statistics panels
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollDetails {
    /// Poll title
    pub title: String,

    /// Formatted start date
    pub start_date: String,

    /// "Ends In" or "Ended On"
    pub time_left_title: &'static str,

    /// Time left for active polls, end date for closed ones
    pub time_left: String,

    /// Total MKR voting on the poll
    pub total_votes: String,

    /// Participation percentage
    pub participation: String,

    /// Number of distinct voters
    pub unique_voters: String,

    /// Discussion link with a scheme
    pub discussion_url: Option<String>,

    /// Shortened creator address
    pub source: String,

    /// Winning single-choice option
    pub winning_option: Option<String>,

    /// Instant-runoff leader or winner banner
    pub banner: Option<RunoffBanner>,
}

/// Per-poll, per-account voting session
pub struct PollView {
    poll: Poll,
    account: Option<AccountAddress>,
    fetch_state: FetchState,
    pending_fetch: Option<FetchRequest>,
    existing_vote: Option<ExistingVote>,
    panel: VotingPanel,
    analytics: AnalyticsContext,
    sink: Box<dyn AnalyticsSink>,
}

impl PollView {
    /// Creates a view without an account, logging analytics events
    pub fn new(poll: Poll) -> Self {
        Self::with_analytics(poll, AnalyticsContext::default(), Box::new(LogAnalyticsSink))
    }

    /// Creates a view without an account, sending analytics events to the sink
    pub fn with_analytics(
        poll: Poll,
        analytics: AnalyticsContext,
        sink: Box<dyn AnalyticsSink>,
    ) -> Self {
        let panel = VotingPanel::new(&poll);
        Self {
            poll,
            account: None,
            fetch_state: FetchState::Idle,
            pending_fetch: None,
            existing_vote: None,
            panel,
            analytics,
            sink,
        }
    }

    /// Poll shown by the view
    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    /// Active account
    pub fn account(&self) -> Option<&AccountAddress> {
        self.account.as_ref()
    }

    /// State of the recorded vote fetch
    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state
    }

    /// In-progress vote of the active account
    pub fn panel(&self) -> &VotingPanel {
        &self.panel
    }

    /// Ranked-choice ballot of the active account
    pub fn ballot(&self) -> Result<&Ballot, PollingError> {
        match &self.panel {
            VotingPanel::Ranked(ballot) => Ok(ballot),
            VotingPanel::SingleChoice(_) => Err(PollingError::InvalidVotingMode),
        }
    }

    /// Single-choice selection of the active account
    pub fn selection(&self) -> Result<&SingleChoiceSelection, PollingError> {
        match &self.panel {
            VotingPanel::SingleChoice(selection) => Ok(selection),
            VotingPanel::Ranked(_) => Err(PollingError::InvalidVotingMode),
        }
    }

    /// Switches the active account
    /// Returns the fetch to start when the account changed to a connected one
    pub fn set_account(&mut self, account: Option<AccountAddress>) -> Option<FetchRequest> {
        if self.account == account {
            return None;
        }

        debug!(
            "Poll {}: account changed to {:?}",
            self.poll.poll_id, account
        );
        self.account = account;
        self.reset_session()
    }

    /// Replaces the poll shown by the view
    /// A refreshed snapshot of the same poll keeps the session; a different poll resets it
    pub fn set_poll(&mut self, poll: Poll) -> Option<FetchRequest> {
        if self.poll.poll_id == poll.poll_id && self.poll.voting_mode == poll.voting_mode {
            self.poll = poll;
            return None;
        }

        debug!("Poll view switched to poll {}", poll.poll_id);
        self.poll = poll;
        self.reset_session()
    }

    /// Applies the result of a recorded vote fetch
    /// Results of superseded requests are dropped and Ok(false) is returned
    pub fn complete_fetch(
        &mut self,
        request: &FetchRequest,
        vote: ExistingVote,
    ) -> Result<bool, PollingError> {
        if self.pending_fetch.as_ref() != Some(request) {
            warn!(
                "Poll {}: dropped stale vote for {} on poll {}",
                self.poll.poll_id, request.account, request.poll_id
            );
            return Ok(false);
        }

        if vote.voting_mode() != self.poll.voting_mode {
            return Err(PollingError::InvalidVotingMode);
        }

        self.pending_fetch = None;
        self.existing_vote = Some(vote);
        self.fetch_state = FetchState::Loaded;

        Ok(true)
    }

    /// Ranks the option in the given slot of the ballot
    pub fn rank(&mut self, slot_index: usize, position: u8) -> Result<(), PollingError> {
        match &mut self.panel {
            VotingPanel::Ranked(ballot) => ballot.select_at(slot_index, position)?,
            VotingPanel::SingleChoice(_) => return Err(PollingError::InvalidVotingMode),
        }

        self.track(EventKind::InputChange, SELECT_RANKED_CHOICE_ID);
        Ok(())
    }

    /// Appends an empty choice to the ballot
    pub fn add_choice(&mut self) -> Result<(), PollingError> {
        match &mut self.panel {
            VotingPanel::Ranked(ballot) => ballot.add_slot(),
            VotingPanel::SingleChoice(_) => Err(PollingError::InvalidVotingMode),
        }
    }

    /// Removes a choice from the ballot
    pub fn remove_choice(&mut self, slot_index: usize) -> Result<(), PollingError> {
        match &mut self.panel {
            VotingPanel::Ranked(ballot) => ballot.remove_slot(slot_index),
            VotingPanel::SingleChoice(_) => Err(PollingError::InvalidVotingMode),
        }
    }

    /// Selects the single-choice option
    pub fn select_option(&mut self, position: u8) -> Result<(), PollingError> {
        match &mut self.panel {
            VotingPanel::SingleChoice(selection) => selection.select(position)?,
            VotingPanel::Ranked(_) => return Err(PollingError::InvalidVotingMode),
        }

        self.track(EventKind::InputChange, SELECT_ID);
        Ok(())
    }

    /// Returns true if the in-progress vote can be submitted
    pub fn can_submit(&self) -> bool {
        self.assert_can_submit().is_ok()
    }

    /// Builds the vote payload and starts a fresh panel
    pub fn submit(&mut self) -> Result<PollingInstruction, PollingError> {
        self.assert_can_submit()?;

        let instruction = match &self.panel {
            VotingPanel::Ranked(ballot) => {
                cast_ranked_vote(self.poll.poll_id, ballot.to_submission()?)
            }
            VotingPanel::SingleChoice(selection) => {
                let option = selection.to_submission()?;
                cast_vote(
                    self.poll.poll_id,
                    option.position,
                    self.poll.support_for(option.position),
                )
            }
        };

        self.track(EventKind::ButtonClick, VOTE_ID);
        self.panel = VotingPanel::new(&self.poll);

        Ok(instruction)
    }

    /// Returns true if the recorded vote can be withdrawn
    pub fn can_withdraw(&self) -> bool {
        self.assert_can_withdraw().is_ok()
    }

    /// Builds the withdraw payload for the recorded vote
    pub fn withdraw(&mut self) -> Result<PollingInstruction, PollingError> {
        let vote = self.assert_can_withdraw()?;

        let instruction = match (&self.panel, vote) {
            (VotingPanel::Ranked(ballot), ExistingVote::Ranked(_)) => ballot.withdraw(),
            (VotingPanel::SingleChoice(selection), ExistingVote::SingleChoice(Some(option))) => {
                selection.withdraw(*option, self.poll.support_for(*option))
            }
            _ => return Err(PollingError::InvalidVotingMode),
        };

        self.track(EventKind::ButtonClick, WITHDRAW_ID);
        Ok(instruction)
    }

    /// Vote breakdown of the poll; not available while the recorded vote is fetched
    pub fn breakdown(&self) -> Result<VoteBreakdown, PollingError> {
        self.assert_not_fetching()?;
        VoteBreakdown::from_poll(&self.poll)
    }

    /// Recorded vote of the active account; an empty vote without an account
    pub fn existing_vote(&self) -> Result<ExistingVote, PollingError> {
        self.assert_not_fetching()?;

        if self.account.is_none() {
            return Ok(ExistingVote::none(self.poll.voting_mode));
        }

        self.existing_vote
            .clone()
            .ok_or(PollingError::DataNotReady)
    }

    /// Status line of the recorded vote
    pub fn vote_status(&self) -> Result<String, PollingError> {
        Ok(vote_status_text(&self.poll, &self.existing_vote()?))
    }

    /// Poll detail and statistics read model
    pub fn details(&self, now: DateTime<Utc>, offset: &FixedOffset) -> PollDetails {
        let poll = &self.poll;

        PollDetails {
            title: poll.title.clone(),
            start_date: format_date(poll.start_date, offset),
            time_left_title: time_left_title(poll.active),
            time_left: time_left(poll.end_date, poll.active, now, offset),
            total_votes: total_votes_text(poll.total_votes),
            participation: participation_text(poll.participation),
            unique_voters: poll.num_unique_voters.unwrap_or_default().to_string(),
            discussion_url: poll.discussion_url(),
            source: cut_middle(&poll.source, 8, 8),
            winning_option: if poll.voting_mode.is_ranked() {
                None
            } else {
                poll.winning_option_label().map(str::to_string)
            },
            banner: if poll.voting_mode.is_ranked() {
                Some(RunoffBanner::from_poll(poll))
            } else {
                None
            },
        }
    }

    fn reset_session(&mut self) -> Option<FetchRequest> {
        self.panel = VotingPanel::new(&self.poll);
        self.existing_vote = None;

        self.pending_fetch = self.account.as_ref().map(|account| FetchRequest {
            account: account.clone(),
            poll_id: self.poll.poll_id,
        });
        self.fetch_state = if self.pending_fetch.is_some() {
            FetchState::Fetching
        } else {
            FetchState::Idle
        };

        self.pending_fetch.clone()
    }

    fn assert_not_fetching(&self) -> Result<(), PollingError> {
        if self.fetch_state == FetchState::Fetching {
            return Err(PollingError::DataNotReady);
        }

        Ok(())
    }

    fn assert_can_submit(&self) -> Result<(), PollingError> {
        match &self.panel {
            VotingPanel::Ranked(ballot) => {
                self.poll.assert_is_active()?;
                if self.account.is_none() {
                    return Err(PollingError::AccountRequired);
                }
                ballot.to_submission().map(|_| ())
            }
            VotingPanel::SingleChoice(selection) => {
                let voting_for = match self.account {
                    Some(_) => self.existing_vote()?.option_voting_for(),
                    None => None,
                };
                selection.assert_can_submit(&self.poll, self.account.as_ref(), voting_for)
            }
        }
    }

    fn assert_can_withdraw(&self) -> Result<&ExistingVote, PollingError> {
        self.poll.assert_is_active()?;

        if self.account.is_none() {
            return Err(PollingError::AccountRequired);
        }
        self.assert_not_fetching()?;

        let vote = self
            .existing_vote
            .as_ref()
            .ok_or(PollingError::DataNotReady)?;
        vote.assert_can_withdraw()?;

        Ok(vote)
    }

    fn track(&self, event_kind: EventKind, id: &str) {
        emit(self.sink.as_ref(), self.analytics.event(event_kind, id));
    }
}
