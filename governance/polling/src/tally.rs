//! Vote breakdown presentation
//!
//! Turns the aggregated per-option tally delivered with a poll into sorted,
//! render-ready rows. Ranked rows carry two bar segments laid over a shared
//! 100%-wide track: the first choice votes, and either the votes transferred to
//! the option or, for an eliminated option, the first choice votes leaving it.

use {
    crate::{
        error::PollingError,
        format::{round_fixed, PLACEHOLDER},
        state::poll::{OptionSupport, Poll, PollOption, TallyEntry},
    },
    rust_decimal::Decimal,
    std::fmt,
};

/// Role of a bar segment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    /// First choice votes of the option
    FirstChoice,

    /// Votes transferred to the option, drawn on top of the first choice votes
    Added,

    /// First choice votes redistributed away from an eliminated option
    Removed,
}

/// Bar segment expressed as a percentage of the track width
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BarSegment {
    /// Segment role
    pub kind: SegmentKind,

    /// Width in percent of the track
    pub width_pct: Decimal,

    /// Signed MKR amount the segment stands for
    pub votes: Decimal,

    /// Percentage of all votes the segment stands for
    pub pct: Decimal,
}

impl BarSegment {
    /// Tooltip text of the segment
    pub fn tooltip(&self) -> String {
        let votes = round_fixed(self.votes.abs(), 1);
        let pct = round_fixed(self.pct, 1);

        match self.kind {
            SegmentKind::FirstChoice => format!("{} MKR ({}%)", votes, pct),
            SegmentKind::Added => format!("+ {} MKR ({}%)", votes, pct),
            SegmentKind::Removed => format!("- {} MKR ({}%)", votes, pct),
        }
    }
}

/// Render-ready instant-runoff row of one option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedRow {
    /// Option the row describes
    pub option: PollOption,

    /// Aggregated statistics of the option
    pub entry: TallyEntry,

    /// MKR held after redistribution, zero for eliminated non-winners
    pub total_votes: Decimal,

    /// Percentage held after redistribution, zero for eliminated non-winners
    pub total_pct: Decimal,

    /// First choice segment, always drawn
    pub first_choice: BarSegment,

    /// Added segment, or Removed for eliminated non-winners
    pub transfer: BarSegment,
}

impl RankedRow {
    fn new(option: PollOption, entry: TallyEntry) -> Self {
        let first_choice = BarSegment {
            kind: SegmentKind::FirstChoice,
            width_pct: entry.first_choice_pct,
            votes: entry.first_choice_votes,
            pct: entry.first_choice_pct,
        };

        let (total_votes, total_pct, transfer) = if entry.is_eliminated_loser() {
            (
                Decimal::ZERO,
                Decimal::ZERO,
                BarSegment {
                    kind: SegmentKind::Removed,
                    width_pct: entry.first_choice_pct,
                    votes: -entry.first_choice_votes,
                    pct: entry.first_choice_pct,
                },
            )
        } else {
            (
                entry.total_votes(),
                entry.first_choice_pct + entry.transfer_pct,
                BarSegment {
                    kind: SegmentKind::Added,
                    width_pct: entry.transfer_pct + entry.first_choice_pct,
                    votes: entry.transfer_votes,
                    pct: entry.transfer_pct,
                },
            )
        };

        Self {
            option,
            entry,
            total_votes,
            total_pct,
            first_choice,
            transfer,
        }
    }

    /// Total text, e.g. "1200.5 MKR (40.0%)"
    pub fn total_text(&self) -> String {
        if self.entry.is_eliminated_loser() {
            "0 MKR (0%)".to_string()
        } else {
            format!(
                "{} MKR ({}%)",
                round_fixed(self.total_votes, 1),
                round_fixed(self.total_pct, 1)
            )
        }
    }
}

impl fmt::Display for RankedRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.option.label, self.total_text())
    }
}

/// Orders items by descending total using a strict greater-than test
///
/// An item moves ahead of its predecessor unless the predecessor's total is
/// strictly greater. Equal totals therefore come out in reverse input order:
/// totals [10, 10, 5] for [X, Y, Z] yield [Y, X, Z].
pub fn sort_by_total<T, F>(mut items: Vec<T>, total: F) -> Vec<T>
where
    F: Fn(&T) -> Decimal,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && !(total(&items[j - 1]) > total(&items[j])) {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
    items
}

/// Pairs options with their instant-runoff statistics by position and sorts them
pub fn present_ranked(
    options: &[PollOption],
    entries: &[TallyEntry],
) -> Result<Vec<RankedRow>, PollingError> {
    if entries.is_empty() {
        return Err(PollingError::DataNotReady);
    }
    if entries.len() != options.len() {
        return Err(PollingError::TallyMismatch);
    }

    let paired: Vec<(PollOption, TallyEntry)> = options
        .iter()
        .cloned()
        .zip(entries.iter().cloned())
        .collect();

    Ok(sort_by_total(paired, |(_, entry)| entry.total_votes())
        .into_iter()
        .map(|(option, entry)| RankedRow::new(option, entry))
        .collect())
}

/// Render-ready single-choice row of one option
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupportRow {
    /// Option the row describes
    pub option: PollOption,

    /// MKR voting for the option, None while the tally is loading
    pub mkr_support: Option<Decimal>,
}

impl SupportRow {
    /// Support text, or the placeholder while the tally is loading
    pub fn value_text(&self) -> String {
        match self.mkr_support {
            Some(support) => format!("{} MKR", round_fixed(support, 2)),
            None => PLACEHOLDER.to_string(),
        }
    }
}

impl fmt::Display for SupportRow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.option.label, self.value_text())
    }
}

/// Single-choice rows in poll order; each row is a placeholder when support is absent
pub fn present_single_choice(
    options: &[PollOption],
    support: Option<&[OptionSupport]>,
) -> Result<Vec<SupportRow>, PollingError> {
    if let Some(support) = support {
        if support.len() != options.len() {
            return Err(PollingError::TallyMismatch);
        }
    }

    Ok(options
        .iter()
        .map(|option| SupportRow {
            option: option.clone(),
            mkr_support: support
                .and_then(|support| support.get(option.position as usize))
                .map(|entry| entry.mkr_support),
        })
        .collect())
}

/// Instant-runoff leader or winner banner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunoffBanner {
    /// Banner title
    pub title: &'static str,

    /// Label of the leading or winning option
    pub leader: Option<String>,

    /// Round count, shown once the poll is closed
    pub rounds: Option<String>,
}

impl RunoffBanner {
    /// Banner of a ranked poll
    pub fn from_poll(poll: &Poll) -> Self {
        Self {
            title: if poll.active {
                "INSTANT RUNOFF LEADER"
            } else {
                "POLL WINNER"
            },
            leader: poll.winner_label().map(str::to_string),
            rounds: if poll.active {
                None
            } else {
                poll.rounds.map(|rounds| format!("{} rounds", rounds))
            },
        }
    }
}

/// Vote breakdown of a poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteBreakdown {
    /// Instant-runoff breakdown
    Ranked {
        /// Leader or winner banner
        banner: RunoffBanner,

        /// Rows sorted by total votes
        rows: Vec<RankedRow>,
    },

    /// Single-choice breakdown
    SingleChoice {
        /// Rows in poll order
        rows: Vec<SupportRow>,

        /// Label of the winning option
        winning_option: Option<String>,
    },
}

impl VoteBreakdown {
    /// Breakdown of the poll in the shape of its voting mode
    pub fn from_poll(poll: &Poll) -> Result<Self, PollingError> {
        let options = poll.options();

        if poll.voting_mode.is_ranked() {
            let rows = present_ranked(&options, poll.ranked_tally()?)?;
            Ok(VoteBreakdown::Ranked {
                banner: RunoffBanner::from_poll(poll),
                rows,
            })
        } else {
            Ok(VoteBreakdown::SingleChoice {
                rows: present_single_choice(&options, poll.option_support()?)?,
                winning_option: poll.winning_option_label().map(str::to_string),
            })
        }
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::state::poll::{test::create_test_record, PollTally},
        std::str::FromStr,
    };

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn create_test_options(labels: &[&str]) -> Vec<PollOption> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| PollOption {
                label: label.to_string(),
                position: i as u8,
            })
            .collect()
    }

    fn create_test_entry(first_choice: &str, transfer: &str) -> TallyEntry {
        TallyEntry {
            first_choice_votes: dec(first_choice),
            transfer_votes: dec(transfer),
            ..TallyEntry::default()
        }
    }

    #[test]
    fn test_sort_places_later_equal_total_first() {
        // Arrange
        let options = create_test_options(&["X", "Y", "Z"]);
        let entries = vec![
            create_test_entry("10", "0"),
            create_test_entry("4", "6"),
            create_test_entry("5", "0"),
        ];

        // Act
        let rows = present_ranked(&options, &entries).unwrap();

        // Assert
        let labels: Vec<&str> = rows.iter().map(|row| row.option.label.as_str()).collect();
        assert_eq!(labels, vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_sort_by_total_descending() {
        let sorted = sort_by_total(vec![1, 5, 3, 5, 2], |v| Decimal::from(*v));

        assert_eq!(sorted, vec![5, 5, 3, 2, 1]);
    }

    #[test]
    fn test_sort_by_total_reverses_equal_runs() {
        let items = vec![("A", 7), ("B", 7), ("C", 7)];

        let sorted = sort_by_total(items, |(_, total)| Decimal::from(*total));

        assert_eq!(sorted, vec![("C", 7), ("B", 7), ("A", 7)]);
    }

    #[test]
    fn test_eliminated_option_row() {
        // Arrange
        let options = create_test_options(&["Out"]);
        let entry = TallyEntry {
            first_choice_votes: dec("300"),
            transfer_votes: dec("25"),
            first_choice_pct: dec("30"),
            transfer_pct: dec("2.5"),
            eliminated: true,
            winner: false,
        };

        // Act
        let row = present_ranked(&options, &[entry]).unwrap().remove(0);

        // Assert
        assert_eq!(row.total_votes, Decimal::ZERO);
        assert_eq!(row.total_pct, Decimal::ZERO);
        assert_eq!(row.total_text(), "0 MKR (0%)");
        assert_eq!(row.first_choice.width_pct, dec("30"));
        assert_eq!(row.transfer.kind, SegmentKind::Removed);
        assert_eq!(row.transfer.width_pct, dec("30"));
        assert_eq!(row.transfer.votes, dec("-300"));
        assert_eq!(row.transfer.tooltip(), "- 300.0 MKR (30.0%)");
    }

    #[test]
    fn test_winner_row_keeps_totals_even_if_eliminated_flag_set() {
        let options = create_test_options(&["Win"]);
        let entry = TallyEntry {
            first_choice_votes: dec("400"),
            transfer_votes: dec("150.25"),
            first_choice_pct: dec("40"),
            transfer_pct: dec("15.025"),
            eliminated: true,
            winner: true,
        };

        let row = present_ranked(&options, &[entry]).unwrap().remove(0);

        assert_eq!(row.total_votes, dec("550.25"));
        assert_eq!(row.total_text(), "550.3 MKR (55.0%)");
        assert_eq!(row.transfer.kind, SegmentKind::Added);
        assert_eq!(row.transfer.width_pct, dec("55.025"));
        assert_eq!(row.transfer.tooltip(), "+ 150.3 MKR (15.0%)");
        assert_eq!(row.first_choice.tooltip(), "400.0 MKR (40.0%)");
    }

    #[test]
    fn test_present_ranked_data_errors() {
        let options = create_test_options(&["A", "B"]);

        assert_eq!(
            present_ranked(&options, &[]),
            Err(PollingError::DataNotReady)
        );
        assert_eq!(
            present_ranked(&options, &[TallyEntry::default()]),
            Err(PollingError::TallyMismatch)
        );
    }

    #[test]
    fn test_present_single_choice_with_short_tally_error() {
        let options = create_test_options(&["A", "B", "C"]);
        let support = vec![OptionSupport {
            mkr_support: dec("5"),
        }];

        assert_eq!(
            present_single_choice(&options, Some(&support)),
            Err(PollingError::TallyMismatch)
        );
    }

    #[test]
    fn test_present_single_choice() {
        let options = create_test_options(&["Yes", "No"]);
        let support = vec![
            OptionSupport {
                mkr_support: dec("1500.125"),
            },
            OptionSupport {
                mkr_support: dec("0"),
            },
        ];

        let rows = present_single_choice(&options, Some(&support)).unwrap();
        assert_eq!(rows[0].value_text(), "1500.13 MKR");
        assert_eq!(rows[1].to_string(), "No: 0.00 MKR");

        let placeholders = present_single_choice(&options, None).unwrap();
        assert!(placeholders.iter().all(|row| row.value_text() == "----"));
        assert_eq!(placeholders.len(), 2);
    }

    #[test]
    fn test_breakdown_from_ranked_poll() {
        // Arrange
        let mut poll = Poll::from_record(create_test_record("Ranked Choice IRV")).unwrap();
        poll.tally = Some(PollTally::Ranked(vec![
            create_test_entry("1", "0"),
            create_test_entry("5", "2"),
            create_test_entry("3", "0"),
        ]));
        poll.winner_index = Some(2);
        poll.rounds = Some(2);
        poll.active = false;

        // Act
        let breakdown = VoteBreakdown::from_poll(&poll).unwrap();

        // Assert
        match breakdown {
            VoteBreakdown::Ranked { banner, rows } => {
                assert_eq!(banner.title, "POLL WINNER");
                assert_eq!(banner.leader.as_deref(), Some("Yes"));
                assert_eq!(banner.rounds.as_deref(), Some("2 rounds"));
                let labels: Vec<&str> =
                    rows.iter().map(|row| row.option.label.as_str()).collect();
                assert_eq!(labels, vec!["Yes", "No", "Abstain"]);
            }
            _ => panic!("Expected ranked breakdown"),
        }
    }

    #[test]
    fn test_breakdown_from_ranked_poll_without_tally_error() {
        let poll = Poll::from_record(create_test_record("Ranked Choice IRV")).unwrap();

        assert_eq!(
            VoteBreakdown::from_poll(&poll),
            Err(PollingError::DataNotReady)
        );
    }
}
