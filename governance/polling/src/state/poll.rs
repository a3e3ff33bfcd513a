//! Poll snapshot

use {
    crate::{error::PollingError, state::enums::VotingMode},
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::{Deserialize as _, Deserializer},
    serde_derive::{Deserialize, Serialize},
    std::fmt,
};

/// Opaque identifier of a poll
pub type PollId = u64;

/// Max number of options a poll can carry; option positions are encoded as u8
pub const MAX_POLL_OPTIONS: usize = u8::MAX as usize;

/// Address of the account voting on a poll
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    /// Creates an account address from its textual form
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Poll option: display label plus its 0-based position in the poll's option list
/// The position is the canonical identifier used in vote payloads
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PollOption {
    /// Option label
    pub label: String,

    /// 0-based position in the poll's option list
    pub position: u8,
}

/// Aggregated instant-runoff statistics of a single option
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyEntry {
    /// MKR ranking the option first
    pub first_choice_votes: Decimal,

    /// MKR transferred to the option from eliminated options
    pub transfer_votes: Decimal,

    /// First choice votes as a percentage of all votes
    pub first_choice_pct: Decimal,

    /// Transferred votes as a percentage of all votes
    pub transfer_pct: Decimal,

    /// The option was eliminated in one of the runoff rounds
    pub eliminated: bool,

    /// The option won (or currently leads) the runoff
    pub winner: bool,
}

impl TallyEntry {
    /// First choice and transferred votes combined
    pub fn total_votes(&self) -> Decimal {
        self.first_choice_votes + self.transfer_votes
    }

    /// Eliminated options that did not win hold no votes after redistribution
    pub fn is_eliminated_loser(&self) -> bool {
        self.eliminated && !self.winner
    }
}

/// Aggregated MKR support of a single-choice option
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSupport {
    /// MKR voting for the option
    pub mkr_support: Decimal,
}

/// Per-option tally in the shape matching the poll's voting mode
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollTally {
    /// Instant-runoff statistics, one entry per option
    Ranked(Vec<TallyEntry>),

    /// Plurality support, one entry per option
    SingleChoice(Vec<OptionSupport>),
}

/// Poll as delivered by a poll source, before the voting mode is resolved
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollRecord {
    /// Poll identifier
    pub poll_id: PollId,

    /// Content hash of the poll document
    pub multi_hash: String,

    /// Human readable vote id the poll route is derived from
    pub vote_id: String,

    /// Poll title
    pub title: String,

    /// Poll description (markdown)
    pub content: String,

    /// Raw poll document
    pub raw_data: Option<String>,

    /// Link to the poll's discussion thread
    pub discussion_link: Option<String>,

    /// Address of the account that created the poll
    pub source: String,

    /// Free-text vote type, e.g. "Ranked Choice IRV"
    pub vote_type: String,

    /// Option labels in poll order
    pub options: Vec<String>,

    /// Voting start
    pub start_date: DateTime<Utc>,

    /// Voting end
    pub end_date: DateTime<Utc>,

    /// True while voting is open
    pub active: bool,

    /// Total MKR participating in the poll
    pub total_votes: Option<Decimal>,

    /// Participating MKR as a percentage of supply
    pub participation: Option<Decimal>,

    /// Number of distinct voters
    pub num_unique_voters: Option<u64>,

    /// 0-based position of the winning single-choice option
    pub winning_proposal: Option<u8>,

    /// 1-based position of the instant-runoff winner or leader
    /// Poll sources send it either as a number or as its decimal string
    #[serde(deserialize_with = "winner_deserialize")]
    pub winner: Option<u16>,

    /// Number of instant-runoff elimination rounds
    pub rounds: Option<u32>,

    /// Instant-runoff statistics
    pub ballot: Option<Vec<TallyEntry>>,

    /// Single-choice support
    pub vote_breakdown: Option<Vec<OptionSupport>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WinnerValue {
    Number(u16),
    Text(String),
}

/// Accepts a numeric or textual winner position
/// Text that is not a valid position leaves the poll without a winner
fn winner_deserialize<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let winner = match Option::<WinnerValue>::deserialize(deserializer)? {
        Some(WinnerValue::Number(winner)) => Some(winner),
        Some(WinnerValue::Text(winner)) => winner.trim().parse().ok(),
        None => None,
    };

    Ok(winner)
}

/// Governance Poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poll {
    /// Poll identifier
    pub poll_id: PollId,

    /// Content hash of the poll document
    pub multi_hash: String,

    /// Human readable vote id the poll route is derived from
    pub vote_id: String,

    /// Poll title
    pub title: String,

    /// Poll description (markdown)
    pub content: String,

    /// Raw poll document
    pub raw_data: Option<String>,

    /// Link to the poll's discussion thread
    pub discussion_link: Option<String>,

    /// Address of the account that created the poll
    pub source: String,

    /// Voting mode resolved when the poll was loaded
    pub voting_mode: VotingMode,

    /// Option labels in poll order, immutable for the poll's lifetime
    pub options: Vec<String>,

    /// Voting start
    pub start_date: DateTime<Utc>,

    /// Voting end
    pub end_date: DateTime<Utc>,

    /// True while voting is open
    pub active: bool,

    /// Per-option tally, None while loading
    pub tally: Option<PollTally>,

    /// Number of instant-runoff elimination rounds
    pub rounds: Option<u32>,

    /// 1-based position of the instant-runoff winner or leader
    pub winner_index: Option<u16>,

    /// 0-based position of the winning single-choice option
    pub winning_option: Option<u8>,

    /// Total MKR participating in the poll
    pub total_votes: Option<Decimal>,

    /// Participating MKR as a percentage of supply
    pub participation: Option<Decimal>,

    /// Number of distinct voters
    pub num_unique_voters: Option<u64>,
}

impl Poll {
    /// Resolves the voting mode and the matching tally shape of a poll record
    pub fn from_record(record: PollRecord) -> Result<Self, PollingError> {
        if record.options.len() > MAX_POLL_OPTIONS {
            return Err(PollingError::TooManyOptions);
        }

        let voting_mode = VotingMode::from_vote_type(&record.vote_type);

        // An empty tally carries no information and is treated as not loaded
        let tally = match voting_mode {
            VotingMode::RankedChoiceIrv => record
                .ballot
                .filter(|entries| !entries.is_empty())
                .map(PollTally::Ranked),
            VotingMode::SingleChoice => record
                .vote_breakdown
                .filter(|entries| !entries.is_empty())
                .map(PollTally::SingleChoice),
        };

        Ok(Self {
            poll_id: record.poll_id,
            multi_hash: record.multi_hash,
            vote_id: record.vote_id,
            title: record.title,
            content: record.content,
            raw_data: record.raw_data,
            discussion_link: record.discussion_link,
            source: record.source,
            voting_mode,
            options: record.options,
            start_date: record.start_date,
            end_date: record.end_date,
            active: record.active,
            tally,
            rounds: record.rounds,
            winner_index: record.winner,
            winning_option: record.winning_proposal,
            total_votes: record.total_votes,
            participation: record.participation,
            num_unique_voters: record.num_unique_voters,
        })
    }

    /// Returns the poll options with their positions
    pub fn options(&self) -> Vec<PollOption> {
        self.options
            .iter()
            .enumerate()
            .map(|(position, label)| PollOption {
                label: label.clone(),
                position: position as u8,
            })
            .collect()
    }

    /// Returns the option at the given 0-based position
    pub fn option(&self, position: u8) -> Result<PollOption, PollingError> {
        self.options
            .get(position as usize)
            .map(|label| PollOption {
                label: label.clone(),
                position,
            })
            .ok_or(PollingError::InvalidOption)
    }

    /// Route slug of the poll
    pub fn slug(&self) -> String {
        to_slug(&self.vote_id)
    }

    /// Label of the instant-runoff winner or leader
    pub fn winner_label(&self) -> Option<&str> {
        self.winner_index
            .and_then(|winner| (winner as usize).checked_sub(1))
            .and_then(|index| self.options.get(index))
            .map(String::as_str)
    }

    /// Label of the winning single-choice option
    pub fn winning_option_label(&self) -> Option<&str> {
        self.winning_option
            .and_then(|position| self.options.get(position as usize))
            .map(String::as_str)
    }

    /// Discussion link with a scheme, None when the poll has no link
    pub fn discussion_url(&self) -> Option<String> {
        match self.discussion_link.as_deref() {
            None | Some("") => None,
            Some(link) if link.starts_with("http") => Some(link.to_string()),
            Some(link) => Some(format!("https://{}", link)),
        }
    }

    /// Instant-runoff tally of a ranked poll
    pub fn ranked_tally(&self) -> Result<&[TallyEntry], PollingError> {
        self.assert_voting_mode(VotingMode::RankedChoiceIrv)?;

        match &self.tally {
            Some(PollTally::Ranked(entries)) => Ok(entries),
            _ => Err(PollingError::DataNotReady),
        }
    }

    /// Single-choice support, None while the tally is loading
    pub fn option_support(&self) -> Result<Option<&[OptionSupport]>, PollingError> {
        self.assert_voting_mode(VotingMode::SingleChoice)?;

        match &self.tally {
            Some(PollTally::SingleChoice(entries)) => {
                if entries.len() != self.options.len() {
                    return Err(PollingError::TallyMismatch);
                }
                Ok(Some(entries))
            }
            _ => Ok(None),
        }
    }

    /// MKR support of a single-choice option
    /// None while the tally is loading or when it does not cover every option
    pub fn support_for(&self, position: u8) -> Option<Decimal> {
        self.option_support()
            .ok()
            .flatten()
            .and_then(|entries| entries.get(position as usize))
            .map(|entry| entry.mkr_support)
    }

    /// Checks the Poll is open for voting
    pub fn assert_is_active(&self) -> Result<(), PollingError> {
        if !self.active {
            return Err(PollingError::PollNotActive);
        }

        Ok(())
    }

    /// Checks the Poll uses the given voting mode
    pub fn assert_voting_mode(&self, voting_mode: VotingMode) -> Result<(), PollingError> {
        if self.voting_mode != voting_mode {
            return Err(PollingError::InvalidVotingMode);
        }

        Ok(())
    }
}

/// Converts a vote id into its route slug
/// Letters and digits are lower-cased, every other run of characters becomes a single '-'
pub fn to_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}
