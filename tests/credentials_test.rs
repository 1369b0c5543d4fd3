//! Credential failover tests
//!
//! Ordering, sticky failure flags and the self-healing second pass.

mod common;

use common::{credentials, FakeDevice, HOSTNAME};
use network_exporter::credentials::{Credential, CredentialState, CredentialStore};
use network_exporter::error::ExporterError;

#[tokio::test]
async fn test_failover_reaches_third_credential() {
    // Given: Two bad credentials followed by a good one
    let device = FakeDevice::accepting(&["good"]);
    let mut store = CredentialStore::new(credentials(&[
        ("bad1", "wrong"),
        ("bad2", "wrong"),
        ("good", "good"),
    ]));

    // When: Authenticating
    let session = store
        .authenticate("node", &*device)
        .await
        .expect("third credential should work");

    // Then: All three were tried in order and the flags reflect the outcome
    assert_eq!(session.credential_index, 2);
    assert_eq!(session.username, "good");
    assert_eq!(session.info.hostname, HOSTNAME);
    assert_eq!(device.attempts(), vec!["bad1", "bad2", "good"]);

    let states: Vec<CredentialState> = store.credentials().iter().map(|c| c.state()).collect();
    assert_eq!(
        states,
        vec![
            CredentialState::Failed,
            CredentialState::Failed,
            CredentialState::Working
        ]
    );
}

#[tokio::test]
async fn test_failed_credentials_are_skipped_on_next_cycle() {
    // Given: A store whose first two credentials already failed once
    let device = FakeDevice::accepting(&["good"]);
    let mut store = CredentialStore::new(credentials(&[
        ("bad1", "wrong"),
        ("bad2", "wrong"),
        ("good", "good"),
    ]));
    store.authenticate("node", &*device).await.unwrap();
    device.clear_attempts();

    // When: Authenticating again
    store.authenticate("node", &*device).await.unwrap();

    // Then: Only the working credential is tried
    assert_eq!(device.attempts(), vec!["good"]);
}

#[tokio::test]
async fn test_second_pass_recovers_flagged_credential() {
    // Given: Both credentials failed in an earlier cycle
    let device = FakeDevice::accepting(&[]);
    let mut store = CredentialStore::new(credentials(&[("a", "pass-a"), ("b", "pass-b")]));
    assert!(store.authenticate("node", &*device).await.is_err());
    assert!(store.credentials().iter().all(|c| c.failed()));

    // When: The first credential becomes valid again
    device.set_valid_passwords(&["pass-a"]);
    device.clear_attempts();
    let session = store.authenticate("node", &*device).await.unwrap();

    // Then: The second pass retries flagged credentials and clears the flag
    assert_eq!(session.credential_index, 0);
    assert_eq!(device.attempts(), vec!["a"]);
    assert_eq!(store.credentials()[0].state(), CredentialState::Working);
    assert!(store.credentials()[1].failed());
}

#[tokio::test]
async fn test_second_pass_skips_credentials_tried_in_first_pass() {
    // Given: One unflagged bad credential and one flagged good one
    let device = FakeDevice::accepting(&[]);
    let mut store = CredentialStore::new(credentials(&[("flagged", "good"), ("fresh", "wrong")]));
    assert!(store.authenticate("node", &*device).await.is_err());
    let mut list = store.credentials().to_vec();
    list[1] = Credential::new("fresh", "wrong");
    store.replace(list);
    device.set_valid_passwords(&["good"]);
    device.clear_attempts();

    // When: Authenticating
    let session = store.authenticate("node", &*device).await.unwrap();

    // Then: The fresh credential is tried once, then the flagged one recovers
    assert_eq!(device.attempts(), vec!["fresh", "flagged"]);
    assert_eq!(session.username, "flagged");
}

#[tokio::test]
async fn test_total_exhaustion_tries_each_credential_once() {
    // Given: No credential is valid
    let device = FakeDevice::accepting(&["something-else"]);
    let mut store = CredentialStore::new(credentials(&[
        ("one", "x"),
        ("two", "y"),
        ("three", "z"),
    ]));

    // When: Authenticating
    let result = store.authenticate("sw01", &*device).await;

    // Then: Every credential is tried exactly once and all are flagged
    match result {
        Err(ExporterError::AuthExhausted { node }) => assert_eq!(node, "sw01"),
        other => panic!("expected AuthExhausted, got {:?}", other),
    }
    assert_eq!(device.auth_calls(), 3);
    assert!(store.credentials().iter().all(|c| c.failed()));
}

#[tokio::test]
async fn test_empty_store_is_exhausted_without_device_calls() {
    // Given: A store without credentials
    let device = FakeDevice::accepting(&["good"]);
    let mut store = CredentialStore::default();

    // When: Authenticating
    let result = store.authenticate("node", &*device).await;

    // Then: It fails without contacting the device
    assert!(matches!(result, Err(ExporterError::AuthExhausted { .. })));
    assert_eq!(device.auth_calls(), 0);
}

#[test]
fn test_credential_debug_hides_password() {
    // Given: A credential with a recognizable password
    let credential = Credential::new("admin", "hunter2");

    // When: Formatting it for logs
    let debug = format!("{:?}", credential);

    // Then: The username is visible but the password is not
    assert!(debug.contains("admin"));
    assert!(!debug.contains("hunter2"));
}
