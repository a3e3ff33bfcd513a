//! Poll data and voting session state

pub mod ballot;
pub mod enums;
pub mod poll;
pub mod single_choice;
pub mod vote_record;
