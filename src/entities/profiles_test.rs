use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use super::*;
use crate::hooks::{Pagination, QueryParams, UseQuery};
use crate::store::MemoryStore;

fn members(n: usize) -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    store.seed(
        TABLE,
        (1..=n).map(|i| {
            json!({
                "id": i,
                "family_no": 100 + (i % 5),
                "name": format!("Member{i}"),
                "surname": if i % 2 == 0 { "Shah" } else { "Mehta" },
                "gender": if i % 3 == 0 { "Female" } else { "Male" },
                "email": format!("m{i}@example.org"),
                "mobile_no1": 9_800_000_000u64 + i as u64,
            })
        }),
    );
    store
}

#[tokio::test]
async fn twenty_five_members_paginate_in_pages_of_twenty() {
    let store = members(25);
    let remote: Arc<dyn Remote> = store;
    let hook = UseQuery::new(
        remote,
        profiles_query(),
        QueryParams::new(Pagination::new(1, 20)),
    );

    let page = hook.settled().await.data.unwrap();
    assert_eq!(page.rows.len(), 20);
    assert_eq!(page.count, 25);
    assert_eq!(hook.params().pagination.total_pages(page.count), 2);

    hook.set_page(2);
    let page = hook.settled().await.data.unwrap();
    assert_eq!(page.rows.len(), 5);
    assert_eq!(page.count, 25);
    assert_eq!(page.rows[0].id.as_deref(), Some("21"));
}

#[tokio::test]
async fn search_and_filters_narrow_the_page() {
    let store = members(25);
    let remote: Arc<dyn Remote> = store;
    let hook = UseQuery::new(
        remote,
        profiles_query(),
        QueryParams::new(Pagination::new(1, 20)),
    );
    hook.settled().await;

    hook.set_search("shah");
    assert_eq!(hook.settled().await.data.unwrap().count, 12);

    hook.apply_filter("gender", Some("Female".into()));
    let page = hook.settled().await.data.unwrap();
    // even ids divisible by 3: 6, 12, 18, 24
    assert_eq!(page.count, 4);

    hook.set_search("9800000007");
    hook.clear_filter("gender");
    let page = hook.settled().await.data.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.rows[0].mobile_no1.as_deref(), Some("9800000007"));
}

#[tokio::test]
async fn fetch_profile_and_verify_family() {
    let store = members(10);
    let profile = fetch_profile(store.as_ref(), "4").await.unwrap();
    assert_eq!(profile.full_name(), "Member4 Shah");
    assert_eq!(profile.family_no.as_deref(), Some("104"));

    let family = verify_family(store.as_ref(), "104").await.unwrap();
    let ids: Vec<_> = family.iter().filter_map(|p| p.id.as_deref()).collect();
    assert_eq!(ids, vec!["4", "9"]);

    let err = fetch_profile(store.as_ref(), "999").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn save_new_member_uploads_picture() {
    let store = MemoryStore::new();
    let ops = MemberOperations::new(&store);
    let member = Profile {
        name: Some("Kavya".to_string()),
        surname: Some("Desai".to_string()),
        family_no: Some("207".to_string()),
        profile_pic: Some(format!(
            "data:image/jpeg;base64,{}",
            STANDARD.encode([0xFF, 0xD8, 0xFF])
        )),
        ..Default::default()
    };

    let saved = ops.save(&member, false).await.unwrap();
    assert_eq!(saved.id.as_deref(), Some("1"));
    assert!(saved.updated_at.is_some());
    let pic = saved.profile_pic.unwrap();
    assert!(pic.starts_with("memory://local/storage/v1/object/public/profile-pictures/profile-"));
    assert!(pic.ends_with(".jpg"));

    let path = pic.rsplit('/').next().unwrap();
    assert_eq!(store.object(PICTURE_BUCKET, path), Some(vec![0xFF, 0xD8, 0xFF]));
    // family numbers are stored numerically
    assert_eq!(store.rows(TABLE)[0]["family_no"], json!(207));
}

#[tokio::test]
async fn save_existing_member_updates_in_place() {
    let store = members(3);
    let ops = MemberOperations::new(store.as_ref());
    let mut member = fetch_profile(store.as_ref(), "2").await.unwrap();
    member.occupation = Some("Architect".to_string());

    let saved = ops.save(&member, true).await.unwrap();
    assert_eq!(saved.occupation.as_deref(), Some("Architect"));
    assert_eq!(store.rows(TABLE).len(), 3);
    assert_eq!(store.rows(TABLE)[1]["occupation"], json!("Architect"));
}

#[tokio::test]
async fn invalid_picture_fails_before_any_write() {
    let store = MemoryStore::new();
    let ops = MemberOperations::new(&store);
    let member = Profile {
        name: Some("X".to_string()),
        profile_pic: Some("data:image/png;base64,@@@not-base64@@@".to_string()),
        ..Default::default()
    };

    let err = ops.save(&member, false).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
    assert!(store.rows(TABLE).is_empty());
}

#[tokio::test]
async fn delete_member() {
    let store = members(3);
    let ops = MemberOperations::new(store.as_ref());
    ops.delete("1").await.unwrap();
    assert_eq!(store.rows(TABLE).len(), 2);
    assert!(ops.delete("1").await.unwrap_err().is_not_found());
}
