//! Poll data sources

use {
    crate::{
        error::PollingError,
        state::{
            poll::{AccountAddress, Poll, PollId, PollRecord},
            vote_record::ExistingVote,
        },
    },
    log::{debug, error},
    serde_derive::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Source of polls and of the votes recorded for accounts
pub trait PollDataProvider {
    /// All known polls in source order
    fn polls(&self) -> &[Poll];

    /// Poll with the given identifier
    fn get_poll(&self, poll_id: PollId) -> Result<Poll, PollingError> {
        self.polls()
            .iter()
            .find(|poll| poll.poll_id == poll_id)
            .cloned()
            .ok_or(PollingError::PollNotFound)
    }

    /// Poll routed under the given slug
    fn find_poll_by_slug(&self, slug: &str) -> Result<Poll, PollingError> {
        self.polls()
            .iter()
            .find(|poll| poll.slug() == slug)
            .cloned()
            .ok_or(PollingError::PollNotFound)
    }

    /// Vote recorded for the account on the poll; an empty vote when there is none
    fn get_existing_vote(
        &self,
        account: &AccountAddress,
        poll: &Poll,
    ) -> Result<ExistingVote, PollingError>;

    /// Polls open for voting
    fn active_polls(&self) -> Vec<&Poll> {
        self.polls().iter().filter(|poll| poll.active).collect()
    }

    /// Closed polls
    fn historical_polls(&self) -> Vec<&Poll> {
        self.polls().iter().filter(|poll| !poll.active).collect()
    }
}

/// Poll snapshot file contents
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSnapshot {
    /// Poll records
    pub polls: Vec<PollRecord>,

    /// Recorded votes keyed by account address, then by poll id
    pub votes: BTreeMap<String, BTreeMap<PollId, ExistingVote>>,
}

/// In-memory provider backed by a poll snapshot
#[derive(Clone, Debug, Default)]
pub struct SnapshotProvider {
    polls: Vec<Poll>,
    votes: BTreeMap<String, BTreeMap<PollId, ExistingVote>>,
}

impl SnapshotProvider {
    /// Resolves every poll record of the snapshot
    pub fn new(snapshot: PollSnapshot) -> Result<Self, PollingError> {
        let polls = snapshot
            .polls
            .into_iter()
            .map(Poll::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Snapshot loaded with {} polls", polls.len());

        Ok(Self {
            polls,
            votes: snapshot.votes,
        })
    }

    /// Parses a JSON snapshot
    pub fn from_json(input: &str) -> Result<Self, PollingError> {
        let snapshot: PollSnapshot = serde_json::from_str(input).map_err(|e| {
            error!("Failed to parse poll snapshot: {}", e);
            PollingError::InvalidSnapshot
        })?;
        Self::new(snapshot)
    }
}

impl PollDataProvider for SnapshotProvider {
    fn polls(&self) -> &[Poll] {
        &self.polls
    }

    fn get_existing_vote(
        &self,
        account: &AccountAddress,
        poll: &Poll,
    ) -> Result<ExistingVote, PollingError> {
        let vote = self
            .votes
            .get(&account.0)
            .and_then(|votes| votes.get(&poll.poll_id));

        match vote {
            Some(vote) if vote.voting_mode() != poll.voting_mode => {
                Err(PollingError::InvalidVotingMode)
            }
            Some(vote) => Ok(vote.clone()),
            None => Ok(ExistingVote::none(poll.voting_mode)),
        }
    }
}
