//! Test helpers for the Vapor API

pub fn create_test_client(url: &str) -> super::Client {
    super::Client::new(Some(url), "test-token").unwrap()
}
