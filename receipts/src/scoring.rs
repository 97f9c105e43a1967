//! Deterministic reward-point rules.
//!
//! Every rule is independent and additive. Currency rules run on integer
//! cents; date and time rules award nothing when their field does not parse.

use crate::domain::{Amount, LineItem, Points, PurchaseRecord};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};

const ROUND_DOLLAR_BONUS: Points = 50;
const QUARTER_MULTIPLE_BONUS: Points = 25;
const POINTS_PER_ITEM_PAIR: Points = 5;
const ODD_DAY_BONUS: Points = 6;
const AFTERNOON_BONUS: Points = 10;

/// Afternoon window in hours, start inclusive, end exclusive
const AFTERNOON_START_HOUR: u32 = 14;
const AFTERNOON_END_HOUR: u32 = 16;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Points awarded by each rule for one record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub retailer: Points,
    pub round_dollar: Points,
    pub quarter_multiple: Points,
    pub item_count: Points,
    pub item_descriptions: Points,
    pub odd_day: Points,
    pub afternoon: Points,
}

impl ScoreBreakdown {
    pub fn for_record(record: &PurchaseRecord) -> Self {
        Self {
            retailer: retailer_points(&record.retailer),
            round_dollar: round_dollar_bonus(record.total),
            quarter_multiple: quarter_multiple_bonus(record.total),
            item_count: item_count_bonus(record.items.len()),
            item_descriptions: item_description_points(&record.items),
            odd_day: odd_day_bonus(&record.purchase_date),
            afternoon: afternoon_bonus(&record.purchase_time),
        }
    }

    pub fn total(&self) -> Points {
        self.retailer
            + self.round_dollar
            + self.quarter_multiple
            + self.item_count
            + self.item_descriptions
            + self.odd_day
            + self.afternoon
    }
}

/// Score a purchase record. Never fails.
pub fn compute_score(record: &PurchaseRecord) -> Points {
    ScoreBreakdown::for_record(record).total()
}

fn retailer_points(retailer: &str) -> Points {
    retailer.chars().filter(|c| c.is_ascii_alphanumeric()).count() as Points
}

fn round_dollar_bonus(total: Amount) -> Points {
    if total.is_positive() && total.cents() % 100 == 0 {
        ROUND_DOLLAR_BONUS
    } else {
        0
    }
}

fn quarter_multiple_bonus(total: Amount) -> Points {
    if total.is_positive() && total.cents() % 25 == 0 {
        QUARTER_MULTIPLE_BONUS
    } else {
        0
    }
}

fn item_count_bonus(item_count: usize) -> Points {
    (item_count / 2) as Points * POINTS_PER_ITEM_PAIR
}

fn item_description_points(items: &[LineItem]) -> Points {
    items
        .iter()
        .filter(|item| item.short_description.trim().chars().count() % 3 == 0)
        .map(|item| fifth_rounded_up(item.price))
        .sum()
}

/// ceil(price * 0.2) in whole units: one point per started 5.00
fn fifth_rounded_up(price: Amount) -> Points {
    price.cents().div_ceil(500)
}

fn odd_day_bonus(purchase_date: &str) -> Points {
    match NaiveDate::parse_from_str(purchase_date, DATE_FORMAT) {
        Ok(date) if date.day() % 2 == 1 => ODD_DAY_BONUS,
        _ => 0,
    }
}

fn afternoon_bonus(purchase_time: &str) -> Points {
    match NaiveTime::parse_from_str(purchase_time, TIME_FORMAT) {
        Ok(time) if (AFTERNOON_START_HOUR..AFTERNOON_END_HOUR).contains(&time.hour()) => {
            AFTERNOON_BONUS
        }
        _ => 0,
    }
}
