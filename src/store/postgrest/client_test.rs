use super::*;
use crate::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE};

fn config(url: &str) -> Config {
    Config {
        url: url.to_string(),
        anon_key: "anon".to_string(),
        timeout_secs: 5,
        debounce_ms: DEFAULT_DEBOUNCE_MS,
        page_size: DEFAULT_PAGE_SIZE,
    }
}

#[test]
fn trailing_slash_is_trimmed() {
    let client = PostgrestClient::new(&config("https://demo.example.co/")).unwrap();
    assert_eq!(client.base_url(), "https://demo.example.co");
}

#[test]
fn rest_and_storage_urls() {
    let client = PostgrestClient::new(&config("https://demo.example.co")).unwrap();
    assert_eq!(
        client.rest_url("event_applications"),
        "https://demo.example.co/rest/v1/event_applications"
    );
    assert_eq!(
        client.storage().public_url("committee-pictures", "youth.jpg"),
        "https://demo.example.co/storage/v1/object/public/committee-pictures/youth.jpg"
    );
}

#[test]
fn requests_carry_project_key() {
    let client = PostgrestClient::new(&config("https://demo.example.co")).unwrap();
    let request = client
        .authorize(client.client.get(client.rest_url("profiles")))
        .build()
        .unwrap();
    assert_eq!(request.headers()["apikey"], "anon");
    assert_eq!(request.headers()["authorization"], "Bearer anon");
}
