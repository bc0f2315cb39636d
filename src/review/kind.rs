//! Application kinds and statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::review::ReviewError;
use crate::serde_utils::string_or_number;
use crate::store::Row;

/// The seven kinds of application the dashboard reviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    Event,
    Donation,
    EducationLoan,
    BusinessLoan,
    GirlsHostel,
    MulundHostel,
    Vatsalyadham,
}

impl ApplicationKind {
    pub const ALL: [ApplicationKind; 7] = [
        ApplicationKind::Event,
        ApplicationKind::Donation,
        ApplicationKind::EducationLoan,
        ApplicationKind::BusinessLoan,
        ApplicationKind::GirlsHostel,
        ApplicationKind::MulundHostel,
        ApplicationKind::Vatsalyadham,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationKind::Event => "event",
            ApplicationKind::Donation => "donation",
            ApplicationKind::EducationLoan => "education_loan",
            ApplicationKind::BusinessLoan => "business_loan",
            ApplicationKind::GirlsHostel => "girls_hostel",
            ApplicationKind::MulundHostel => "mulund_hostel",
            ApplicationKind::Vatsalyadham => "vatsalyadham",
        }
    }

    /// Table holding submitted applications of this kind.
    pub fn source_table(&self) -> &'static str {
        match self {
            ApplicationKind::Event => "event_applications",
            ApplicationKind::Donation => "donation_applications",
            ApplicationKind::EducationLoan => "education_loan_applications",
            ApplicationKind::BusinessLoan => "business_loan_applications",
            ApplicationKind::GirlsHostel => "girls_hostel_form",
            ApplicationKind::MulundHostel => "mulund_hostel_form",
            ApplicationKind::Vatsalyadham => "vatsalyadham_form",
        }
    }

    /// Table an approved application moves to, for kinds that are promoted.
    pub fn production_table(&self) -> Option<&'static str> {
        match self {
            ApplicationKind::Event => Some("events"),
            ApplicationKind::Donation => Some("donations"),
            _ => None,
        }
    }

    pub fn search_columns(&self) -> &'static [&'static str] {
        match self {
            ApplicationKind::Event => &["name"],
            ApplicationKind::Donation => &["cause"],
            ApplicationKind::EducationLoan => &["full_name", "institution_name"],
            ApplicationKind::BusinessLoan => &["business_name", "nature_of_business"],
            ApplicationKind::GirlsHostel | ApplicationKind::MulundHostel => {
                &["applicant_name", "institution"]
            }
            ApplicationKind::Vatsalyadham => &["applicant_name"],
        }
    }

    /// Column shown as the application's title in listings.
    pub fn title_column(&self) -> &'static str {
        self.search_columns()[0]
    }
}

impl fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationKind {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ApplicationKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| ReviewError::UnknownKind {
                kind: s.to_string(),
            })
    }
}

/// Review status. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn can_transition_to(&self, next: ApplicationStatus) -> bool {
        *self == ApplicationStatus::Pending && next != ApplicationStatus::Pending
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ReviewError::UnknownStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// One application row. Kind specific columns stay untyped in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(flatten)]
    pub fields: Row,
}

impl Application {
    /// Missing status counts as pending.
    pub fn status(&self) -> ApplicationStatus {
        self.status.unwrap_or_default()
    }

    /// Text of one kind specific column, if present.
    pub fn field(&self, column: &str) -> Option<String> {
        self.fields
            .get(column)
            .filter(|v| !v.is_null())
            .map(crate::store::value_text)
    }
}
