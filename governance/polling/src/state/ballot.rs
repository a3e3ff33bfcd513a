//! Ranked-choice ballot

use {
    crate::{
        error::PollingError,
        format::choice_ordinal,
        instruction::{withdraw_ranked_vote, PollingInstruction},
        state::poll::{PollId, PollOption},
    },
    log::debug,
};

/// One rank position of a ballot filled with an option
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BallotSelection {
    /// Option label
    pub label: String,

    /// 0-based position of the option in the poll's option list
    pub position: u8,
}

impl From<PollOption> for BallotSelection {
    fn from(option: PollOption) -> Self {
        Self {
            label: option.label,
            position: option.position,
        }
    }
}

/// In-progress ranked-choice ballot of one account on one poll
///
/// The ballot is an ordered list of slots, one per rank. Only the trailing slot
/// can be edited and a new slot can only be appended once the trailing slot is
/// filled, so an earlier rank is never empty while a later one is filled.
/// An option can be ranked at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    poll_id: PollId,
    options: Vec<PollOption>,
    slots: Vec<Option<BallotSelection>>,
}

impl Ballot {
    /// Creates a ballot with a single empty slot
    pub fn new(poll_id: PollId, options: Vec<PollOption>) -> Self {
        let mut ballot = Self {
            poll_id,
            options: vec![],
            slots: vec![],
        };
        ballot.initialize(options);
        ballot
    }

    /// Resets the ballot to a single empty slot over the given options
    pub fn initialize(&mut self, options: Vec<PollOption>) {
        self.options = options;
        self.slots = vec![None];
    }

    /// Poll the ballot is cast on
    pub fn poll_id(&self) -> PollId {
        self.poll_id
    }

    /// Number of slots, filled or not
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slots in rank order
    pub fn slots(&self) -> &[Option<BallotSelection>] {
        &self.slots
    }

    /// Filled slots in rank order
    pub fn selections(&self) -> impl Iterator<Item = &BallotSelection> {
        self.slots.iter().flatten()
    }

    /// Returns true if the slot is the trailing, editable slot
    pub fn is_editable(&self, slot_index: usize) -> bool {
        slot_index + 1 == self.slots.len()
    }

    /// Text shown in a slot: the chosen label, or the rank placeholder when empty
    pub fn slot_placeholder(&self, slot_index: usize) -> Option<String> {
        let slot = self.slots.get(slot_index)?;

        Some(match slot {
            Some(selection) => selection.label.clone(),
            None => format!("{} choice", choice_ordinal(slot_index + 1)),
        })
    }

    /// Options not ranked in any slot, in poll order
    pub fn unchosen_options(&self) -> Vec<PollOption> {
        self.options
            .iter()
            .filter(|option| !self.is_chosen(&option.label))
            .cloned()
            .collect()
    }

    /// Ranks the option at the given position in the trailing slot
    pub fn select_at(&mut self, slot_index: usize, position: u8) -> Result<(), PollingError> {
        self.assert_is_editable(slot_index)?;

        let option = self
            .options
            .iter()
            .find(|option| option.position == position)
            .cloned()
            .ok_or(PollingError::InvalidOption)?;

        let ranked_elsewhere = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slot_index)
            .filter_map(|(_, slot)| slot.as_ref())
            .any(|selection| selection.label == option.label);

        if ranked_elsewhere {
            return Err(PollingError::DuplicateSelection);
        }

        debug!(
            "Poll {}: rank {} set to option {}",
            self.poll_id,
            slot_index + 1,
            option.position
        );
        self.slots[slot_index] = Some(option.into());

        Ok(())
    }

    /// Removes the slot and shifts the later slots up by one rank
    /// Removing the only slot leaves a single empty slot
    pub fn remove_slot(&mut self, slot_index: usize) -> Result<(), PollingError> {
        if slot_index >= self.slots.len() {
            return Err(PollingError::InvalidSlot);
        }

        self.slots.remove(slot_index);
        if self.slots.is_empty() {
            self.slots.push(None);
        }

        debug!(
            "Poll {}: rank {} removed, {} slot(s) left",
            self.poll_id,
            slot_index + 1,
            self.slots.len()
        );

        Ok(())
    }

    /// Returns true if the trailing slot is filled and an option is left to rank
    pub fn can_add_slot(&self) -> bool {
        matches!(self.slots.last(), Some(Some(_))) && !self.unchosen_options().is_empty()
    }

    /// Appends an empty, editable slot
    pub fn add_slot(&mut self) -> Result<(), PollingError> {
        if !self.can_add_slot() {
            return Err(PollingError::BallotFull);
        }

        self.slots.push(None);

        Ok(())
    }

    /// Canonical ranking: 0-based option positions of the filled slots in rank order
    pub fn to_submission(&self) -> Result<Vec<u8>, PollingError> {
        let rankings: Vec<u8> = self
            .selections()
            .map(|selection| selection.position)
            .collect();

        if rankings.is_empty() {
            return Err(PollingError::EmptyBallot);
        }

        Ok(rankings)
    }

    /// Withdraw payload for the ballot's poll; the ballot is left untouched
    pub fn withdraw(&self) -> PollingInstruction {
        withdraw_ranked_vote(self.poll_id)
    }

    fn is_chosen(&self, label: &str) -> bool {
        self.selections().any(|selection| selection.label == label)
    }

    fn assert_is_editable(&self, slot_index: usize) -> Result<(), PollingError> {
        if !self.is_editable(slot_index) {
            return Err(PollingError::InvalidSlot);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {super::*, assert_matches::assert_matches, proptest::prelude::*, std::collections::HashSet};

    fn create_test_options(count: usize) -> Vec<PollOption> {
        (0..count)
            .map(|i| PollOption {
                label: format!("Option {}", (b'A' + i as u8) as char),
                position: i as u8,
            })
            .collect()
    }

    fn create_test_ballot(count: usize) -> Ballot {
        Ballot::new(7, create_test_options(count))
    }

    #[test]
    fn test_new_ballot_has_single_empty_slot() {
        let ballot = create_test_ballot(3);

        assert_eq!(ballot.slot_count(), 1);
        assert_eq!(ballot.slots(), &[None]);
        assert!(ballot.is_editable(0));
        assert!(!ballot.can_add_slot());
        assert_eq!(ballot.unchosen_options(), create_test_options(3));
        assert_eq!(ballot.slot_placeholder(0).as_deref(), Some("1st choice"));
    }

    #[test]
    fn test_submission_follows_slot_order() {
        // Arrange
        let mut ballot = create_test_ballot(3);

        // Act
        ballot.select_at(0, 2).unwrap();
        ballot.add_slot().unwrap();
        ballot.select_at(1, 0).unwrap();
        ballot.add_slot().unwrap();
        ballot.select_at(2, 1).unwrap();

        // Assert
        assert_eq!(ballot.to_submission().unwrap(), vec![2, 0, 1]);
        assert!(ballot.unchosen_options().is_empty());
        assert!(!ballot.can_add_slot());
        assert_eq!(ballot.add_slot(), Err(PollingError::BallotFull));
    }

    #[test]
    fn test_select_at_locked_slot_error() {
        // Arrange
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 0).unwrap();
        ballot.add_slot().unwrap();
        let before = ballot.clone();

        // Act
        let err = ballot.select_at(0, 1).err().unwrap();

        // Assert
        assert_eq!(err, PollingError::InvalidSlot);
        assert_eq!(ballot, before);
    }

    #[test]
    fn test_select_at_out_of_range_slot_error() {
        let mut ballot = create_test_ballot(3);

        assert_matches!(ballot.select_at(1, 0), Err(PollingError::InvalidSlot));
    }

    #[test]
    fn test_select_at_duplicate_option_error() {
        // Arrange
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 1).unwrap();
        ballot.add_slot().unwrap();
        let before = ballot.clone();

        // Act
        let err = ballot.select_at(1, 1).err().unwrap();

        // Assert
        assert_eq!(err, PollingError::DuplicateSelection);
        assert_eq!(ballot, before);
    }

    #[test]
    fn test_select_at_invalid_option_error() {
        let mut ballot = create_test_ballot(3);

        assert_matches!(ballot.select_at(0, 3), Err(PollingError::InvalidOption));
    }

    #[test]
    fn test_reselect_trailing_slot() {
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 1).unwrap();

        ballot.select_at(0, 1).unwrap();
        ballot.select_at(0, 2).unwrap();

        assert_eq!(ballot.to_submission().unwrap(), vec![2]);
        assert_eq!(ballot.unchosen_options(), {
            let options = create_test_options(3);
            vec![options[0].clone(), options[1].clone()]
        });
    }

    #[test]
    fn test_add_slot_with_empty_trailing_slot_error() {
        let mut ballot = create_test_ballot(3);

        assert_eq!(ballot.add_slot(), Err(PollingError::BallotFull));
        assert_eq!(ballot.slot_count(), 1);
    }

    #[test]
    fn test_remove_non_trailing_slot() {
        // Arrange
        let mut ballot = create_test_ballot(4);
        ballot.select_at(0, 3).unwrap();
        ballot.add_slot().unwrap();
        ballot.select_at(1, 0).unwrap();
        ballot.add_slot().unwrap();
        ballot.select_at(2, 2).unwrap();

        // Act
        ballot.remove_slot(0).unwrap();

        // Assert
        assert_eq!(ballot.slot_count(), 2);
        assert_eq!(ballot.to_submission().unwrap(), vec![0, 2]);
        assert!(ballot.is_editable(1));
        assert!(!ballot.is_editable(0));
        assert_eq!(ballot.unchosen_options().len(), 2);
    }

    #[test]
    fn test_remove_empty_trailing_slot() {
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 0).unwrap();
        ballot.add_slot().unwrap();

        ballot.remove_slot(1).unwrap();

        assert_eq!(ballot.slot_count(), 1);
        assert!(ballot.is_editable(0));
        assert!(ballot.can_add_slot());
    }

    #[test]
    fn test_remove_only_slot_leaves_empty_slot() {
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 0).unwrap();

        ballot.remove_slot(0).unwrap();

        assert_eq!(ballot.slots(), &[None]);
        assert_eq!(ballot.to_submission(), Err(PollingError::EmptyBallot));
    }

    #[test]
    fn test_remove_slot_out_of_range_error() {
        let mut ballot = create_test_ballot(3);

        assert_eq!(ballot.remove_slot(1), Err(PollingError::InvalidSlot));
        assert_eq!(ballot.slot_count(), 1);
    }

    #[test]
    fn test_empty_ballot_submission_error() {
        let ballot = create_test_ballot(3);

        assert_eq!(ballot.to_submission(), Err(PollingError::EmptyBallot));
    }

    #[test]
    fn test_withdraw_leaves_ballot_untouched() {
        let mut ballot = create_test_ballot(3);
        ballot.select_at(0, 1).unwrap();
        let before = ballot.clone();

        let instruction = ballot.withdraw();

        assert_eq!(instruction, PollingInstruction::WithdrawRankedVote { poll_id: 7 });
        assert_eq!(ballot, before);
    }

    #[test]
    fn test_slot_placeholder() {
        let mut ballot = create_test_ballot(5);
        ballot.select_at(0, 4).unwrap();
        ballot.add_slot().unwrap();

        assert_eq!(ballot.slot_placeholder(0).as_deref(), Some("Option E"));
        assert_eq!(ballot.slot_placeholder(1).as_deref(), Some("2nd choice"));
        assert_eq!(ballot.slot_placeholder(2), None);
    }

    #[derive(Clone, Debug)]
    enum BallotAction {
        Select(usize, u8),
        Add,
        Remove(usize),
    }

    fn ballot_actions(option_count: usize) -> impl Strategy<Value = Vec<BallotAction>> {
        let max_slot = option_count + 1;
        let action = prop_oneof![
            (0..max_slot, 0..=option_count as u8)
                .prop_map(|(slot, position)| BallotAction::Select(slot, position)),
            Just(BallotAction::Add),
            (0..max_slot).prop_map(BallotAction::Remove),
        ];
        prop::collection::vec(action, 0..40)
    }

    fn assert_ballot_invariants(ballot: &Ballot, option_count: usize) {
        let labels: Vec<&String> = ballot.selections().map(|s| &s.label).collect();
        let unique: HashSet<&String> = labels.iter().cloned().collect();
        assert_eq!(labels.len(), unique.len());

        assert!(ballot.slot_count() >= 1);
        assert!(ballot.slot_count() <= option_count);

        // Every rank before the trailing one is filled
        let trailing = ballot.slot_count() - 1;
        assert!(ballot.slots()[..trailing].iter().all(Option::is_some));
    }

    proptest! {
        #[test]
        fn test_ballot_invariants_hold_for_any_actions(
            (option_count, actions) in (1usize..6).prop_flat_map(|n| (Just(n), ballot_actions(n)))
        ) {
            let mut ballot = create_test_ballot(option_count);

            for action in actions {
                let before = ballot.clone();
                let result = match action {
                    BallotAction::Select(slot, position) => {
                        let editable = ballot.is_editable(slot);
                        let result = ballot.select_at(slot, position);
                        if !editable {
                            prop_assert_eq!(result.clone(), Err(PollingError::InvalidSlot));
                        }
                        result
                    }
                    BallotAction::Add => ballot.add_slot(),
                    BallotAction::Remove(slot) => ballot.remove_slot(slot),
                };

                if result.is_err() {
                    prop_assert_eq!(&ballot, &before);
                }
                assert_ballot_invariants(&ballot, option_count);
            }
        }
    }
}
