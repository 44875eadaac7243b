/// End-to-end tests of the sync engine against a gated in-process backend
///
/// The gates let each test choose the order in which network completions arrive.
mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chat_sync::{ChatError, ChatSession, ErrorKind, LoadOutcome, Role, SendOrdering, SendOutcome};
use chrono::{NaiveDate, TimeZone, Utc};
use common::{GatedService, MessageBuilder, identity, wait_until};

fn session(ordering: SendOrdering) -> (ChatSession, Arc<GatedService>) {
    let service = Arc::new(GatedService::new());
    (ChatSession::new(service.clone(), ordering), service)
}

fn contents(session: &ChatSession) -> Vec<String> {
    session.messages().into_iter().map(|m| m.content).collect()
}

fn assert_unique_ids(session: &ChatSession) {
    let messages = session.messages();
    let ids: HashSet<_> = messages.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids.len(), messages.len(), "duplicate ids in {:?}", messages);
}

#[tokio::test]
async fn test_concurrent_sends_land_in_completion_order() {
    let (session, service) = session(SendOrdering::Concurrent);
    session.select_identity("a@example.com").await.unwrap();
    let release_a = service.gate_send("first");
    let release_b = service.gate_send("second");

    let a = tokio::spawn({
        let session = session.clone();
        async move { session.send("first").await }
    });
    let b = tokio::spawn({
        let session = session.clone();
        async move { session.send("second").await }
    });
    wait_until(|| session.messages().len() == 2).await;
    assert!(session.messages().iter().all(|m| m.is_provisional()));

    release_b.send(()).unwrap();
    assert!(matches!(b.await.unwrap().unwrap(), SendOutcome::Confirmed { .. }));

    assert_eq!(contents(&session), vec!["first", "second", "re: second"]);
    assert!(session.messages()[0].is_provisional());
    assert!(session.is_busy(), "first send is still pending");

    release_a.send(()).unwrap();
    assert!(matches!(a.await.unwrap().unwrap(), SendOutcome::Confirmed { .. }));

    assert_eq!(contents(&session), vec!["second", "re: second", "first", "re: first"]);
    assert!(session.messages().iter().all(|m| !m.is_provisional()));
    assert!(!session.is_busy());
    assert_unique_ids(&session);
}

#[tokio::test]
async fn test_serialized_sends_land_in_issue_order() {
    let (session, service) = session(SendOrdering::Serialized);
    session.select_identity("a@example.com").await.unwrap();
    let release_a = service.gate_send("first");
    let release_b = service.gate_send("second");

    let a = tokio::spawn({
        let session = session.clone();
        async move { session.send("first").await }
    });
    let b = tokio::spawn({
        let session = session.clone();
        async move { session.send("second").await }
    });
    wait_until(|| session.messages().len() == 2).await;

    // The second request may not even start until the first has settled
    release_b.send(()).unwrap();
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    assert_eq!(session.messages().iter().filter(|m| m.is_provisional()).count(), 2);

    release_a.send(()).unwrap();
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    assert_eq!(contents(&session), vec!["first", "re: first", "second", "re: second"]);
    assert!(!session.is_busy());
    assert_unique_ids(&session);
}

#[tokio::test]
async fn test_serialized_queue_starts_fresh_for_new_identity() {
    let (session, service) = session(SendOrdering::Serialized);
    session.select_identity("a@example.com").await.unwrap();
    let release_stale = service.gate_send("stale");

    let stale = tokio::spawn({
        let session = session.clone();
        async move { session.send("stale").await }
    });
    wait_until(|| session.messages().len() == 1).await;

    session.select_identity("b@example.com").await.unwrap();
    let fresh = tokio::time::timeout(Duration::from_millis(500), session.send("fresh"))
        .await
        .expect("send for the new identity waited on the previous identity's request")
        .unwrap();

    assert!(matches!(fresh, SendOutcome::Confirmed { .. }));
    assert_eq!(contents(&session), vec!["fresh", "re: fresh"]);
    assert!(!session.is_busy());

    release_stale.send(()).unwrap();
    assert_eq!(stale.await.unwrap().unwrap(), SendOutcome::Discarded);
    assert_eq!(contents(&session), vec!["fresh", "re: fresh"]);
}

#[tokio::test]
async fn test_send_completion_after_identity_switch_is_discarded() {
    let (session, service) = session(SendOrdering::Concurrent);
    session.select_identity("a@example.com").await.unwrap();
    let release = service.gate_send("hello");

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.send("hello").await }
    });
    wait_until(|| session.messages().len() == 1).await;

    session.select_identity("b@example.com").await.unwrap();
    release.send(()).unwrap();

    assert_eq!(pending.await.unwrap().unwrap(), SendOutcome::Discarded);
    assert!(session.messages().is_empty());
    assert!(!session.is_busy());
    assert_eq!(session.identity(), Some(identity("b@example.com")));

    // The server still stored the pair under the original identity
    assert_eq!(service.stored(&identity("a@example.com")).await.len(), 2);
}

#[tokio::test]
async fn test_history_after_identity_switch_is_discarded() {
    let (session, service) = session(SendOrdering::Concurrent);
    service.seed(
        &identity("a@example.com"),
        vec![MessageBuilder::new("1").content("from a").build()],
    );
    let release = service.gate_history();

    let load = tokio::spawn({
        let session = session.clone();
        async move { session.select_identity("a@example.com").await }
    });
    wait_until(|| session.identity().is_some()).await;

    session.switch_identity("b@example.com").unwrap();
    release.send(()).unwrap();

    assert_eq!(load.await.unwrap().unwrap(), LoadOutcome::Discarded);
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn test_reload_during_send_orphans_confirmation() {
    let (session, service) = session(SendOrdering::Concurrent);
    session.select_identity("a@example.com").await.unwrap();
    let release = service.gate_send("hello");

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.send("hello").await }
    });
    wait_until(|| session.messages().len() == 1).await;

    // The backend has not stored anything yet, so the reload wipes the provisional record
    assert_eq!(session.reload().await.unwrap(), LoadOutcome::Loaded(0));
    assert!(session.messages().is_empty());

    release.send(()).unwrap();
    assert_eq!(pending.await.unwrap().unwrap(), SendOutcome::Orphaned);
    assert!(session.messages().is_empty());
    assert!(!session.is_busy());

    assert_eq!(session.reload().await.unwrap(), LoadOutcome::Loaded(2));
    assert_eq!(contents(&session), vec!["hello", "re: hello"]);
}

#[tokio::test]
async fn test_failed_send_rolls_back_and_keeps_input_cleared() {
    let (session, service) = session(SendOrdering::Concurrent);
    let alice = identity("a@example.com");
    service.seed(
        &alice,
        vec![
            MessageBuilder::new("1").content("hi").build(),
            MessageBuilder::new("2").assistant().content("hello").build(),
        ],
    );
    session.select_identity("a@example.com").await.unwrap();
    let before = session.messages();
    service.fail_send("boom");

    session.set_input("boom");
    let err = session.submit().await.unwrap_err();

    assert!(matches!(err, ChatError::SendFailed { .. }));
    assert_eq!(session.messages(), before);
    assert_eq!(session.last_error(), Some(ErrorKind::SendFailed));
    assert!(session.input().is_empty());
    assert!(!session.is_busy());
    assert!(session.take_focus_request());

    // The next successful send clears the banner
    session.send("again").await.unwrap();
    assert_eq!(session.last_error(), None);
    assert_eq!(session.messages().len(), 4);
}

#[tokio::test]
async fn test_failed_history_shows_error_not_empty_state() {
    let (session, service) = session(SendOrdering::Concurrent);
    service.fail_history(true);

    let err = session.select_identity("a@example.com").await.unwrap_err();

    assert!(matches!(err, ChatError::HistoryUnavailable { .. }));
    let view = session.view();
    assert_eq!(view.error_reason(), Some("Failed to load chat history"));
    assert!(!view.show_empty_state());

    service.fail_history(false);
    session.reload().await.unwrap();
    assert!(session.view().show_empty_state());
}

#[tokio::test]
async fn test_view_while_pending_is_busy() {
    let (session, service) = session(SendOrdering::Concurrent);
    session.select_identity("a@example.com").await.unwrap();
    let release = service.gate_send("hello");

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.send("hello").await }
    });
    wait_until(|| session.is_busy()).await;

    let view = session.view();
    assert!(view.busy);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].message.role, Role::User);

    release.send(()).unwrap();
    pending.await.unwrap().unwrap();
    assert!(!session.view().busy);
}

#[tokio::test]
async fn test_history_view_groups_by_day() {
    let (session, service) = session(SendOrdering::Concurrent);
    service.seed(
        &identity("a@example.com"),
        vec![
            MessageBuilder::new("1").at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()).build(),
            MessageBuilder::new("2")
                .assistant()
                .at(Utc.with_ymd_and_hms(2024, 3, 1, 10, 1, 0).unwrap())
                .build(),
            MessageBuilder::new("3").at(Utc.with_ymd_and_hms(2024, 3, 14, 18, 0, 0).unwrap()).build(),
            MessageBuilder::new("4").at(Utc.with_ymd_and_hms(2024, 3, 15, 7, 30, 0).unwrap()).build(),
        ],
    );
    session.select_identity("a@example.com").await.unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
    let view = session.view_at(today, &Utc);

    let separators: Vec<_> = view.rows.iter().map(|r| r.separator.as_deref()).collect();
    assert_eq!(separators, vec![Some("01/03/2024"), None, Some("Yesterday"), Some("Today")]);
    assert_eq!(view.rows[3].time, "07:30");
}
