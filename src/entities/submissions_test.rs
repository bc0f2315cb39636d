use super::*;
use crate::store::{MemoryStore, value_text};

fn event() -> EventSubmission {
    EventSubmission {
        user_id: "u-1".to_string(),
        name: "Navratri Garba".to_string(),
        description: "Community garba night".to_string(),
        start_at: "2024-10-05T19:00:00Z".to_string(),
        duration: "4h".to_string(),
        organizers: vec!["Youth Wing".to_string(), "Mahila Mandal".to_string()],
        image: None,
    }
}

#[tokio::test]
async fn event_without_image_is_inserted_pending() {
    let store = MemoryStore::new();

    let app = submit_event(&store, event()).await.unwrap();

    assert_eq!(app.id, "1");
    assert_eq!(app.status(), ApplicationStatus::Pending);
    let rows = store.rows("event_applications");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["organizers"].as_array().map(Vec::len), Some(2));
    assert!(rows[0].get("image_url").is_none());
}

#[tokio::test]
async fn event_image_is_stored_under_the_row_id() {
    let store = MemoryStore::new();
    let mut submission = event();
    submission.image = Some(ImageUpload {
        file_name: "poster.png".to_string(),
        bytes: vec![1, 2, 3],
        content_type: None,
    });

    let app = submit_event(&store, submission).await.unwrap();

    assert_eq!(app.field("image_url").as_deref(), Some("1.png"));
    assert_eq!(store.object(PICTURE_BUCKET, "1.png"), Some(vec![1, 2, 3]));
    let rows = store.rows("event_applications");
    assert_eq!(value_text(&rows[0]["image_url"]), "1.png");
}

#[tokio::test]
async fn donation_image_without_extension_defaults_to_jpg() {
    let store = MemoryStore::new();
    let submission = DonationSubmission {
        user_id: "u-2".to_string(),
        amount: 5000.0,
        description: "Books for the library".to_string(),
        cause: "Education".to_string(),
        open_till: "2024-12-31".to_string(),
        image: Some(ImageUpload {
            file_name: "scan".to_string(),
            bytes: vec![9],
            content_type: Some("image/jpeg".to_string()),
        }),
    };

    let app = submit_donation(&store, submission).await.unwrap();

    assert_eq!(app.field("image_url").as_deref(), Some("1.jpg"));
    assert!(store.object(PICTURE_BUCKET, "1.jpg").is_some());
    assert_eq!(store.rows("donation_applications").len(), 1);
}

#[tokio::test]
async fn invalid_submissions_never_reach_the_store() {
    let store = MemoryStore::new();

    let mut blank = event();
    blank.name = "  ".to_string();
    let err = submit_event(&store, blank).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    let donation = DonationSubmission {
        user_id: "u-2".to_string(),
        amount: 0.0,
        cause: "Relief".to_string(),
        ..Default::default()
    };
    let err = submit_donation(&store, donation).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation { .. }));

    assert!(store.rows("event_applications").is_empty());
    assert!(store.rows("donation_applications").is_empty());
}
