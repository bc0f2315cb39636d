use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::hooks::UseQuery;
use crate::store::{MemoryStore, StorageClient};

fn row(id: &str, name: &str, member: &str) -> CommitteeRow {
    CommitteeRow {
        id: id.to_string(),
        created_at: None,
        name: Some(name.to_string()),
        phone: None,
        location: None,
        member_name: Some(member.to_string()),
    }
}

fn image(name: &str) -> CommitteeImage {
    CommitteeImage {
        name: name.to_string(),
        url: format!("https://cdn.example/{name}"),
        created_at: None,
    }
}

#[test]
fn rows_group_by_trimmed_lowercase_name() {
    let rows = vec![
        row("1", " Youth Wing", "Raj"),
        row("2", "Mahila Mandal", "Gita"),
        row("3", "youth wing ", "Sita"),
        row("4", "  ", "Nobody"),
    ];
    let committees = group_committees(&rows, &[image("Youth Wing.JPG"), image("other.png")]);

    assert_eq!(committees.len(), 2);
    let youth = &committees[0];
    assert_eq!(youth.key, "youth wing");
    assert_eq!(youth.name, "Youth Wing");
    assert_eq!(youth.image_url.as_deref(), Some("https://cdn.example/Youth Wing.JPG"));
    assert_eq!(youth.members.len(), 2);
    assert_eq!(youth.members[0].role, MemberRole::Head);
    assert_eq!(youth.members[0].name.as_deref(), Some("Raj"));
    assert_eq!(youth.members[1].role, MemberRole::Member);

    assert_eq!(committees[1].name, "Mahila Mandal");
    assert!(committees[1].image_url.is_none());
}

#[tokio::test]
async fn committee_lifecycle() {
    let store = Arc::new(MemoryStore::new());
    let first = add_committee(
        store.as_ref(),
        &NewCommittee {
            name: "Seva Samiti".to_string(),
            location: "Mulund".to_string(),
            member_name: "Harsh".to_string(),
            phone: "9820000000".to_string(),
        },
    )
    .await
    .unwrap();
    add_member(store.as_ref(), "seva samiti ", "Ila", "9820000001", None)
        .await
        .unwrap();
    upload_committee_image(store.as_ref(), "Seva Samiti", vec![1, 2], "png")
        .await
        .unwrap();

    let remote: Arc<dyn Remote> = store.clone();
    let hook = UseQuery::new(remote, CommitteesQuery, QueryParams::default());
    let committees = hook.settled().await.data.unwrap();
    assert_eq!(committees.len(), 1);
    assert_eq!(committees[0].members.len(), 2);
    assert_eq!(
        committees[0].image_url.as_deref(),
        Some("memory://local/storage/v1/object/public/committee-pictures/Seva Samiti.png")
    );

    let mut patch = Row::new();
    patch.insert("phone".to_string(), json!("9999999999"));
    let updated = update_committee(store.as_ref(), &first.id, patch).await.unwrap();
    assert_eq!(updated.phone.as_deref(), Some("9999999999"));

    delete_committee(store.as_ref(), &first.id).await.unwrap();
    assert_eq!(store.rows(TABLE).len(), 1);

    let removed = delete_committee_by_name(store.as_ref(), "SEVA SAMITI").await.unwrap();
    assert_eq!(removed, 1);
    assert!(store.rows(TABLE).is_empty());
}

#[tokio::test]
async fn image_upload_replaces_existing_file() {
    let store = MemoryStore::new();
    upload_committee_image(&store, "Youth", vec![1], ".jpg").await.unwrap();
    upload_committee_image(&store, "Youth", vec![2], "jpg").await.unwrap();
    assert_eq!(store.object(IMAGE_BUCKET, "Youth.jpg"), Some(vec![2]));

    let images = committee_images(&store).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].url, store.public_url(IMAGE_BUCKET, "Youth.jpg"));
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let store = MemoryStore::new();
    let err = add_committee(&store, &NewCommittee::default()).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
    let err = upload_committee_image(&store, " ", vec![], "png").await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));
}
