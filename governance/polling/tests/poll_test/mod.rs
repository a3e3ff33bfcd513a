#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc, str::FromStr};

use chrono::{TimeZone, Utc};
use governance_polling::{
    analytics::{AnalyticsContext, AnalyticsError, AnalyticsEvent, AnalyticsSink},
    provider::{PollDataProvider, PollSnapshot, SnapshotProvider},
    rust_decimal::Decimal,
    state::{
        poll::{AccountAddress, OptionSupport, PollRecord, TallyEntry},
        vote_record::ExistingVote,
    },
    view::PollView,
};

pub mod cookies;
use self::cookies::{AccountCookie, PollCookie};

pub const RANKED_VOTE_TYPE: &str = "Ranked Choice IRV";
pub const SINGLE_CHOICE_VOTE_TYPE: &str = "Plurality Voting";

#[derive(Clone, Default)]
pub struct RecordingSink {
    pub events: Rc<RefCell<Vec<AnalyticsEvent>>>,
}

impl AnalyticsSink for RecordingSink {
    fn track(&self, event: &AnalyticsEvent) -> Result<(), AnalyticsError> {
        self.events.borrow_mut().push(event.clone());
        Ok(())
    }
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn tally_entry(first_choice: &str, transfer: &str) -> TallyEntry {
    TallyEntry {
        first_choice_votes: dec(first_choice),
        transfer_votes: dec(transfer),
        ..TallyEntry::default()
    }
}

pub struct PollingTest {
    pub snapshot: PollSnapshot,
    pub sink: RecordingSink,
    next_poll_id: u64,
}

impl PollingTest {
    pub fn start_new() -> Self {
        Self {
            snapshot: PollSnapshot::default(),
            sink: RecordingSink::default(),
            next_poll_id: 1,
        }
    }

    pub fn with_ranked_poll(&mut self, options: &[&str]) -> PollCookie {
        self.with_poll(RANKED_VOTE_TYPE, options)
    }

    pub fn with_single_choice_poll(&mut self, options: &[&str]) -> PollCookie {
        self.with_poll(SINGLE_CHOICE_VOTE_TYPE, options)
    }

    pub fn with_poll(&mut self, vote_type: &str, options: &[&str]) -> PollCookie {
        let poll_id = self.next_poll_id;
        self.next_poll_id += 1;

        let record = PollRecord {
            poll_id,
            multi_hash: format!("QmPoll{}", poll_id),
            vote_id: format!("Test Poll #{}", poll_id),
            title: format!("Test poll {}", poll_id),
            content: "# Poll".to_string(),
            raw_data: Some(format!("---\npoll: {}\n---\nraw body\n", poll_id)),
            discussion_link: Some("forum.makerdao.com/t/test-poll".to_string()),
            source: "0x14341f81dF14cA86E1420eC9e6Abd343Fb1c5bfC".to_string(),
            vote_type: vote_type.to_string(),
            options: options.iter().map(|option| option.to_string()).collect(),
            start_date: Utc.with_ymd_and_hms(2020, 3, 2, 16, 0, 0).unwrap(),
            end_date: Utc.with_ymd_and_hms(2020, 3, 5, 16, 0, 0).unwrap(),
            active: true,
            ..PollRecord::default()
        };

        self.snapshot.polls.push(record.clone());

        PollCookie {
            poll_id,
            slug: format!("test-poll-{}", poll_id),
            record,
        }
    }

    pub fn with_ranked_tally(&mut self, poll_cookie: &mut PollCookie, entries: Vec<TallyEntry>) {
        poll_cookie.record.ballot = Some(entries);
        self.update_poll(poll_cookie);
    }

    pub fn with_option_support(&mut self, poll_cookie: &mut PollCookie, support: &[&str]) {
        poll_cookie.record.vote_breakdown = Some(
            support
                .iter()
                .map(|value| OptionSupport {
                    mkr_support: dec(value),
                })
                .collect(),
        );
        self.update_poll(poll_cookie);
    }

    pub fn with_closed_poll(&mut self, poll_cookie: &mut PollCookie) {
        poll_cookie.record.active = false;
        self.update_poll(poll_cookie);
    }

    pub fn with_recorded_vote(
        &mut self,
        poll_cookie: &PollCookie,
        address: &str,
        vote: ExistingVote,
    ) {
        self.snapshot
            .votes
            .entry(address.to_string())
            .or_default()
            .insert(poll_cookie.poll_id, vote);
    }

    pub fn update_poll(&mut self, poll_cookie: &PollCookie) {
        if let Some(record) = self
            .snapshot
            .polls
            .iter_mut()
            .find(|record| record.poll_id == poll_cookie.poll_id)
        {
            *record = poll_cookie.record.clone();
        }
    }

    pub fn provider(&self) -> SnapshotProvider {
        SnapshotProvider::new(self.snapshot.clone()).unwrap()
    }

    pub fn open_view(&self, poll_cookie: &PollCookie) -> PollView {
        let poll = self.provider().find_poll_by_slug(&poll_cookie.slug).unwrap();
        PollView::with_analytics(
            poll,
            AnalyticsContext::default(),
            Box::new(self.sink.clone()),
        )
    }

    /// Connects the account without resolving its recorded vote
    pub fn with_pending_account(&self, view: &mut PollView, address: &str) -> AccountCookie {
        let address = AccountAddress::new(address);
        let fetch_request = view.set_account(Some(address.clone()));

        AccountCookie {
            address,
            fetch_request,
        }
    }

    /// Connects the account and applies its recorded vote from the snapshot
    pub fn with_account(&self, view: &mut PollView, address: &str) -> AccountCookie {
        let account_cookie = self.with_pending_account(view, address);

        if let Some(request) = &account_cookie.fetch_request {
            let vote = self
                .provider()
                .get_existing_vote(&account_cookie.address, view.poll())
                .unwrap();
            view.complete_fetch(request, vote).unwrap();
        }

        account_cookie
    }

    pub fn analytics_ids(&self) -> Vec<String> {
        self.sink
            .events
            .borrow()
            .iter()
            .map(|event| event.id.clone())
            .collect()
    }
}
