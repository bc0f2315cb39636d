use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::cli::commands::PageParams;
use crate::cli::commands::birthdays::list_birthdays;
use crate::cli::commands::committees::list_committees;
use crate::cli::commands::doctors::list_doctors;
use crate::cli::commands::families::list_families;
use crate::cli::commands::stats::show_stats;
use crate::entities::birthdays::BirthdayFilter;
use crate::store::{MemoryStore, Remote};

fn community() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.seed(
        "profiles",
        [
            json!({"id": 1, "family_no": 7, "name": "Harsh", "surname": "Vora", "gender": "Male",
                   "relationship": "Self", "date_of_birth": "19/Oct/80", "residential_address_city": "Mulund"}),
            json!({"id": 2, "family_no": 7, "name": "Nita", "surname": "Vora", "gender": "female",
                   "relationship": "Wife", "date_of_birth": "02/Mar/83"}),
            json!({"id": 3, "family_no": 9, "name": "Kiran", "surname": "Doshi", "gender": "Male"}),
        ],
    );
    store.seed(
        "doctors",
        [json!({"id": 1, "name": "Dr. Parekh", "specialization": "Cardiology",
                "qualification": "MD", "experience_years": 12, "created_at": "2024-01-01"})],
    );
    store.seed(
        "committee",
        [
            json!({"id": 1, "name": "Youth Wing", "member_name": "Raj", "created_at": "2024-01-01"}),
            json!({"id": 2, "name": "youth wing", "member_name": "Sita", "created_at": "2024-01-02"}),
        ],
    );
    store.seed(
        "event_applications",
        [json!({"id": 4, "name": "Garba", "status": "pending", "created_at": "2024-09-01"})],
    );
    Arc::new(store)
}

fn first_page() -> PageParams<'static> {
    PageParams {
        page: 1,
        page_size: 10,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_doctors_table() {
    let remote: Arc<dyn Remote> = community();
    let output = list_doctors(remote, first_page(), "table").await.unwrap();
    assert!(output.contains("Dr. Parekh"));
    assert!(output.contains("12 yrs"));
}

#[tokio::test]
async fn test_list_families_json() {
    let remote: Arc<dyn Remote> = community();
    let output = list_families(remote, first_page(), "json").await.unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["count"], 2);
    assert_eq!(parsed["rows"][0]["id"], "7");
    assert_eq!(parsed["rows"][0]["total_members"], 2);
}

#[tokio::test]
async fn test_list_committees_groups_members() {
    let store = community();
    let output = list_committees(store.as_ref(), "json").await.unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["members"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_birthdays_today() {
    let store = community();
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

    let output = list_birthdays(store.as_ref(), BirthdayFilter::Today, today, "table")
        .await
        .unwrap();
    assert!(output.contains("Harsh Vora"));
    assert!(output.contains("October 19"));
    assert!(!output.contains("Nita"));

    let none = list_birthdays(
        store.as_ref(),
        BirthdayFilter::Today,
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        "table",
    )
    .await
    .unwrap();
    assert_eq!(none, "No birthdays today.");
}

#[tokio::test]
async fn test_show_stats_json() {
    let store = community();
    let output = show_stats(store.as_ref(), 5, "json").await.unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["total_members"], 3);
    assert_eq!(parsed["gender"]["male"], 2);
    assert_eq!(parsed["gender"]["female"], 1);
    assert_eq!(parsed["total_families"], 2);
    assert_eq!(parsed["total_committees"], 1);
    assert_eq!(parsed["pending_applications"], 1);
    assert_eq!(parsed["recent_applications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_show_stats_table_lists_recent() {
    let store = community();
    let output = show_stats(store.as_ref(), 5, "table").await.unwrap();
    assert!(output.contains("Recent event applications"));
    assert!(output.contains("Garba"));
}
