use std::sync::Arc;

use serde_json::json;

use crate::cli::commands::PageParams;
use crate::cli::commands::applications::{decide, list_applications};
use crate::cli::error::CliError;
use crate::review::{ApplicationKind, ApplicationStatus, ReviewError};
use crate::store::{MemoryStore, Remote};

fn store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.seed(
        "event_applications",
        [
            json!({"id": 1, "name": "Navratri Garba", "status": "pending", "created_at": "2024-09-01"}),
            json!({"id": 2, "name": "Blood Donation Camp", "status": "pending", "created_at": "2024-09-05"}),
        ],
    );
    store.seed(
        "education_loan_applications",
        [json!({"id": 10, "full_name": "Riya Mehta", "status": "pending"})],
    );
    Arc::new(store)
}

#[tokio::test]
async fn test_list_applications_newest_first() {
    let store = store();
    let remote: Arc<dyn Remote> = store.clone();
    let output = list_applications(
        remote,
        ApplicationKind::Event,
        PageParams {
            page: 1,
            page_size: 10,
            ..Default::default()
        },
        "table",
    )
    .await
    .unwrap();

    let camp = output.find("Blood Donation Camp").unwrap();
    let garba = output.find("Navratri Garba").unwrap();
    assert!(camp < garba);
    assert!(output.contains("pending"));
    assert!(output.contains("Page 1 of 1 (2 total)"));
}

#[tokio::test]
async fn test_list_applications_empty_kind() {
    let remote: Arc<dyn Remote> = store();
    let output = list_applications(
        remote,
        ApplicationKind::GirlsHostel,
        PageParams {
            page: 1,
            page_size: 10,
            ..Default::default()
        },
        "table",
    )
    .await
    .unwrap();
    assert_eq!(output, "No girls hostel applications found.");
}

#[tokio::test]
async fn test_approve_event_moves_it_to_events() {
    let store = store();
    let message = decide(store.as_ref(), ApplicationKind::Event, "1", ApplicationStatus::Approved)
        .await
        .unwrap();

    assert_eq!(message, "✓ approved event application 1 and moved to events");
    assert_eq!(store.rows("events").len(), 1);
    assert_eq!(store.rows("event_applications").len(), 1);
}

#[tokio::test]
async fn test_reject_loan_updates_status_once() {
    let store = store();
    let message = decide(
        store.as_ref(),
        ApplicationKind::EducationLoan,
        "10",
        ApplicationStatus::Rejected,
    )
    .await
    .unwrap();
    assert_eq!(message, "✓ rejected education_loan application 10");

    let again = decide(
        store.as_ref(),
        ApplicationKind::EducationLoan,
        "10",
        ApplicationStatus::Approved,
    )
    .await;
    assert!(matches!(
        again,
        Err(CliError::Review(ReviewError::InvalidTransition { .. }))
    ));
}
