//! Display formatting of poll timing, amounts and ranks

use {
    chrono::{DateTime, FixedOffset, Utc},
    rust_decimal::{Decimal, RoundingStrategy},
    std::fmt,
};

/// Participation below this percentage (and above zero) is shown as "< 0.01%"
pub const MIN_MKR_PERCENTAGE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Placeholder shown for values that are not known yet
pub const PLACEHOLDER: &str = "----";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Whole days, hours and minutes left until a poll ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeRemaining {
    /// Whole days
    pub days: i64,
    /// Whole hours after the days are taken out
    pub hours: i64,
    /// Whole minutes after the days and hours are taken out
    pub minutes: i64,
}

impl TimeRemaining {
    /// Breaks the seconds down into days, then hours, then minutes
    /// Each unit is floored and subtracted before the next one is computed
    pub fn from_seconds(seconds: i64) -> Self {
        let mut left = seconds;

        let days = left.div_euclid(SECONDS_PER_DAY);
        left -= days * SECONDS_PER_DAY;

        let hours = left.div_euclid(SECONDS_PER_HOUR);
        left -= hours * SECONDS_PER_HOUR;

        let minutes = left.div_euclid(SECONDS_PER_MINUTE);

        Self {
            days,
            hours,
            minutes,
        }
    }

    /// Time left between now and the end date, at whole-second resolution
    pub fn until(end_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_seconds(end_date.timestamp() - now.timestamp())
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} day{} {} hr{} {} min{}",
            self.days,
            plural_suffix(self.days),
            self.hours,
            plural_suffix(self.hours),
            self.minutes,
            plural_suffix(self.minutes)
        )
    }
}

fn plural_suffix(count: i64) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}

/// Time left for an active poll, or the absolute end date of a closed one
pub fn time_left(
    end_date: DateTime<Utc>,
    active: bool,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> String {
    if active {
        TimeRemaining::until(end_date, now).to_string()
    } else {
        format_date(end_date, offset)
    }
}

/// Label of the time-left row
pub fn time_left_title(active: bool) -> &'static str {
    if active {
        "Ends In"
    } else {
        "Ended On"
    }
}

/// Absolute date in the British short form, e.g. "Sat, 17 Oct 2026, 14:05"
pub fn format_date(date: DateTime<Utc>, offset: &FixedOffset) -> String {
    date.with_timezone(offset)
        .format("%a, %-d %b %Y, %H:%M")
        .to_string()
}

/// Rank ordinal: 1st, 2nd, 3rd, then "<n>th"
pub fn choice_ordinal(rank: usize) -> String {
    match rank {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}

/// Rounds half away from zero and renders exactly `decimals` fraction digits
pub fn round_fixed(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Total MKR voting on the poll
pub fn total_votes_text(total_votes: Option<Decimal>) -> String {
    match total_votes {
        Some(total_votes) => format!("{} MKR", round_fixed(total_votes, 2)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Participation percentage; tiny non-zero values are shown as a bound
pub fn participation_text(participation: Option<Decimal>) -> String {
    match participation {
        None => PLACEHOLDER.to_string(),
        Some(value) if value < MIN_MKR_PERCENTAGE && !value.is_zero() => {
            format!("< {}%", MIN_MKR_PERCENTAGE)
        }
        Some(value) => format!("{}%", round_fixed(value, 2)),
    }
}

/// Keeps the head and the tail of a long text, e.g. an address
pub fn cut_middle(text: &str, left: usize, right: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= left + right {
        return text.to_string();
    }

    let head: String = chars[..left].iter().collect();
    let tail: String = chars[chars.len() - right..].iter().collect();
    format!("{}...{}", head, tail)
}
