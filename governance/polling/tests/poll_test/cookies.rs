use governance_polling::{
    state::poll::{AccountAddress, PollId, PollRecord},
    view::FetchRequest,
};

#[derive(Debug, Clone)]
pub struct PollCookie {
    pub poll_id: PollId,

    pub slug: String,

    pub record: PollRecord,
}

#[derive(Debug, Clone)]
pub struct AccountCookie {
    pub address: AccountAddress,

    pub fetch_request: Option<FetchRequest>,
}
