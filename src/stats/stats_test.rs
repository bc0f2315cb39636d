use serde_json::json;

use super::*;
use crate::store::MemoryStore;

#[test]
fn gender_breakdown_drops_null_and_blank() {
    let values = [Some("Male"), Some("female"), Some("Other"), Some(""), None];
    let breakdown = gender_breakdown(values);
    assert_eq!(
        breakdown,
        GenderBreakdown {
            male: 1,
            female: 1,
            other: 1
        }
    );
    assert_eq!(breakdown.total(), 3);
}

#[test]
fn gender_breakdown_is_case_insensitive() {
    let breakdown = gender_breakdown([Some("MALE"), Some(" male "), Some("FeMale"), Some("x")]);
    assert_eq!(breakdown.male, 2);
    assert_eq!(breakdown.female, 1);
    assert_eq!(breakdown.other, 1);
}

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.seed(
        "profiles",
        vec![
            json!({"id": 1, "family_no": 10, "gender": "Male"}),
            json!({"id": 2, "family_no": 10, "gender": "Female"}),
            json!({"id": 3, "family_no": "11", "gender": null}),
            json!({"id": 4, "family_no": null, "gender": ""}),
            json!({"id": 5, "family_no": 12, "gender": "other"}),
        ],
    );
    store.seed(
        "doctors",
        vec![json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})],
    );
    store.seed(
        "committee",
        vec![
            json!({"id": 1, "name": "Youth Wing", "member_name": "Raj"}),
            json!({"id": 2, "name": " youth wing ", "member_name": "Sita"}),
            json!({"id": 3, "name": "Mahila Mandal", "member_name": "Gita"}),
        ],
    );
    store.seed(
        "event_applications",
        (1..=7).map(|i| {
            json!({
                "id": format!("e-{i}"),
                "name": format!("Event {i}"),
                "status": if i % 2 == 0 { "approved" } else { "pending" },
                "created_at": format!("2024-07-0{i}"),
            })
        }),
    );
    store.seed(
        "donation_applications",
        vec![json!({"id": "d-1", "cause": "School", "status": "pending"})],
    );
    store.seed(
        "vatsalyadham_form",
        vec![
            json!({"id": 1, "applicant_name": "K", "status": "pending"}),
            json!({"id": 2, "applicant_name": "L", "status": "rejected"}),
        ],
    );
    store
}

#[tokio::test]
async fn collect_aggregates_every_table() {
    let store = seeded();
    let stats = DashboardStats::collect(&store, DEFAULT_RECENT).await.unwrap();

    assert_eq!(stats.total_members, 5);
    assert_eq!(
        stats.gender,
        GenderBreakdown {
            male: 1,
            female: 1,
            other: 1
        }
    );
    assert_eq!(stats.total_families, 3);
    assert_eq!(stats.total_doctors, 2);
    assert_eq!(stats.total_committees, 2);
    assert_eq!(stats.event_applications, 7);
    assert_eq!(stats.donation_applications, 1);
    // 4 pending events, 1 donation, 1 vatsalyadham
    assert_eq!(stats.pending_applications, 6);

    let recent: Vec<_> = stats
        .recent_applications
        .iter()
        .map(|a| a.id.as_str())
        .collect();
    assert_eq!(recent, vec!["e-7", "e-6", "e-5", "e-4", "e-3"]);
}

#[tokio::test]
async fn collect_on_empty_store_is_all_zero() {
    let store = MemoryStore::new();
    let stats = DashboardStats::collect(&store, 3).await.unwrap();
    assert_eq!(stats.total_members, 0);
    assert_eq!(stats.gender.total(), 0);
    assert_eq!(stats.pending_applications, 0);
    assert!(stats.recent_applications.is_empty());
}
