use miette::Diagnostic;
use thiserror::Error;

use crate::review::{ApplicationKind, ApplicationStatus};
use crate::store::StoreError;

#[derive(Error, Diagnostic, Debug)]
pub enum ReviewError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("Cannot move application from {from} to {to}")]
    #[diagnostic(
        code(community_admin::review::invalid_transition),
        help("Only pending applications can be approved or rejected.")
    )]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },

    #[error("{kind} application '{id}' was copied to production but could not be removed")]
    #[diagnostic(
        code(community_admin::review::partial_promotion),
        help("Approving it again finishes the promotion without inserting a duplicate.")
    )]
    PartialPromotion {
        kind: ApplicationKind,
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("Unknown application kind: {kind}")]
    #[diagnostic(
        code(community_admin::review::unknown_kind),
        help(
            "Expected one of: event, donation, education_loan, business_loan, girls_hostel, mulund_hostel, vatsalyadham."
        )
    )]
    UnknownKind { kind: String },

    #[error("Unknown application status: {status}")]
    #[diagnostic(code(community_admin::review::unknown_status))]
    UnknownStatus { status: String },
}

pub type ReviewResult<T> = Result<T, ReviewError>;
