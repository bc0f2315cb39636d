//! Member birthdays derived from `profiles.date_of_birth`.
//!
//! Dates are stored as free text like `04/Jul/85` or `4/jul/1985`. Rows that
//! do not parse are skipped rather than failing the whole list.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{Datelike, Local, Month, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::entities::{profiles, select_all};
use crate::hooks::{Fetch, QueryParams};
use crate::store::{Remote, Select, StoreError, StoreResult};

const COLUMNS: &str = "name,surname,date_of_birth,profile_pic,mobile_no1,email";

/// Shown when a member has no profile picture.
pub const DEFAULT_AVATAR: &str =
    "https://t3.ftcdn.net/jpg/05/16/27/58/360_F_516275801_f3Fsp17x6HQK0xQgDQEELoTuERO4SsWV.jpg";

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BirthdayFilter {
    Today,
    Month,
    #[default]
    All,
}

impl BirthdayFilter {
    fn admits(&self, month: u32, day: u32, today: NaiveDate) -> bool {
        match self {
            BirthdayFilter::Today => month == today.month() && day == today.day(),
            BirthdayFilter::Month => month == today.month(),
            BirthdayFilter::All => true,
        }
    }
}

impl fmt::Display for BirthdayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BirthdayFilter::Today => "today",
            BirthdayFilter::Month => "month",
            BirthdayFilter::All => "all",
        })
    }
}

impl FromStr for BirthdayFilter {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(BirthdayFilter::Today),
            "month" => Ok(BirthdayFilter::Month),
            "all" => Ok(BirthdayFilter::All),
            other => Err(StoreError::validation(format!(
                "unknown birthday filter '{other}', expected today, month or all"
            ))),
        }
    }
}

/// Parse `DD/Mon/YY` or `DD/Mon/YYYY`. Two digit years below 50 are 20xx.
pub fn parse_birth_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.trim().split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let day: u32 = day.trim().parse().ok()?;
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month.trim()))? as u32
        + 1;
    let year_text = year.trim();
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += if year < 50 { 2000 } else { 1900 };
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Completed years between `born` and `today`.
fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

#[derive(Debug, Clone, Deserialize)]
struct BirthdayRow {
    name: Option<String>,
    surname: Option<String>,
    date_of_birth: Option<String>,
    profile_pic: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_utils::opt_string_or_number")]
    mobile_no1: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Birthday {
    pub id: String,
    pub name: String,
    pub age: i32,
    pub month: u32,
    pub day: u32,
    /// Display form, e.g. `July 4`.
    pub date: String,
    pub image: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

fn to_birthday(row: BirthdayRow, today: NaiveDate) -> Option<Birthday> {
    let raw = row.date_of_birth?;
    let born = parse_birth_date(&raw)?;
    let name = row.name.unwrap_or_default();
    let month_name = Month::try_from(born.month() as u8).ok()?.name();
    Some(Birthday {
        id: format!("{name}-{raw}"),
        name: format!("{name} {}", row.surname.unwrap_or_default())
            .trim()
            .to_string(),
        age: age_on(born, today),
        month: born.month(),
        day: born.day(),
        date: format!("{month_name} {}", born.day()),
        image: row
            .profile_pic
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
        phone: row.mobile_no1,
        email: row.email,
    })
}

fn build_birthdays(rows: Vec<BirthdayRow>, filter: BirthdayFilter, today: NaiveDate) -> Vec<Birthday> {
    let mut birthdays: Vec<Birthday> = rows
        .into_iter()
        .filter_map(|row| to_birthday(row, today))
        .filter(|b| filter.admits(b.month, b.day, today))
        .collect();
    birthdays.sort_by_key(|b| (b.month, b.day));
    birthdays
}

pub async fn birthdays(
    remote: &dyn Remote,
    filter: BirthdayFilter,
    today: NaiveDate,
) -> StoreResult<Vec<Birthday>> {
    let query = Select::table(profiles::TABLE)
        .columns(COLUMNS)
        .not_null("date_of_birth");
    let rows: Vec<BirthdayRow> = select_all(remote, query).await?;
    Ok(build_birthdays(rows, filter, today))
}

/// Birthdays relative to `today`, or the local date when unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BirthdaysQuery {
    pub filter: BirthdayFilter,
    pub today: Option<NaiveDate>,
}

#[async_trait]
impl Fetch for BirthdaysQuery {
    type Output = Vec<Birthday>;

    async fn fetch(&self, remote: &dyn Remote, _params: &QueryParams) -> StoreResult<Vec<Birthday>> {
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        birthdays(remote, self.filter, today).await
    }
}

#[cfg(test)]
#[path = "birthdays_test.rs"]
mod birthdays_test;
