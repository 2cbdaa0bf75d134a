use crate::utils::*;
use std::sync::Arc;
use waveportal::{Action, ComposeState, Controller, Update, WAVE_GAS_LIMIT};
use waveportal_test_utils::{MockPortal, MockWallet, SendOutcome};

fn composing(controller: &mut Controller, draft: &str) {
    controller.start_composing();
    controller.set_draft_message(draft);
}

#[tokio::test]
async fn successful_wave_resets_compose() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    controller.detect_existing_connection().await;
    composing(&mut controller, "hi");

    controller.submit_wave().await;
    assert_eq!(controller.state().compose, ComposeState::Idle);
    assert_eq!(controller.state().draft_message, "");
    assert_eq!(portal.sent(), vec![("hi".to_string(), 300_000)]);
    // Count is read once before and once after the transaction.
    assert_eq!(portal.total_reads(), 2);
}

#[tokio::test]
async fn sends_with_fixed_gas_limit() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    composing(&mut controller, "gm");

    controller.submit_wave().await;
    let sent = portal.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, WAVE_GAS_LIMIT);
}

#[tokio::test]
async fn submits_without_connected_account() {
    // The wallet authorized an account but the page never learned about it.
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    composing(&mut controller, "hello");
    assert_eq!(controller.state().connected_account, None);

    controller.submit_wave().await;
    assert_eq!(portal.sent(), vec![("hello".to_string(), WAVE_GAS_LIMIT)]);
    assert!(!controller.state().is_composing());
}

#[tokio::test]
async fn submits_empty_draft() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    controller.start_composing();

    controller.submit_wave().await;
    assert_eq!(portal.sent(), vec![(String::new(), WAVE_GAS_LIMIT)]);
    assert!(!controller.state().is_composing());
}

#[tokio::test]
async fn failed_sends_keep_draft() {
    for outcome in [SendOutcome::Reverted, SendOutcome::Rejected, SendOutcome::NetworkFailure] {
        let portal = MockPortal::new();
        portal.set_send_outcome(outcome);
        let mut controller = connected(&portal);
        controller.detect_existing_connection().await;
        composing(&mut controller, "hello");

        controller.submit_wave().await;
        assert!(controller.state().is_composing(), "{outcome:?}");
        assert_eq!(controller.state().draft_message, "hello", "{outcome:?}");
        assert!(portal.sent().is_empty(), "{outcome:?}");
        assert_eq!(controller.alert(), None, "{outcome:?}");
    }
}

#[tokio::test]
async fn failed_count_read_keeps_draft() {
    let portal = MockPortal::new();
    portal.fail_reads(true);
    let mut controller = connected(&portal);
    composing(&mut controller, "hello");

    controller.submit_wave().await;
    assert!(portal.sent().is_empty());
    assert!(controller.state().is_composing());
    assert_eq!(controller.state().draft_message, "hello");
}

#[tokio::test]
async fn no_signer_keeps_draft() {
    let portal = MockPortal::new();
    let mut controller = disconnected(&portal);
    composing(&mut controller, "hello");

    controller.submit_wave().await;
    assert!(portal.sent().is_empty());
    assert_eq!(portal.total_reads(), 0);
    assert_eq!(controller.state().draft_message, "hello");
}

#[tokio::test]
async fn rejected_send_can_be_retried() {
    let portal = MockPortal::new();
    portal.set_send_outcome(SendOutcome::Rejected);
    let mut controller = connected(&portal);
    composing(&mut controller, "again");

    controller.submit_wave().await;
    assert!(controller.state().is_composing());

    portal.set_send_outcome(SendOutcome::Mined);
    controller.submit_wave().await;
    assert_eq!(portal.sent(), vec![("again".to_string(), WAVE_GAS_LIMIT)]);
    assert!(!controller.state().is_composing());
}

#[tokio::test]
async fn task_captures_draft() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    composing(&mut controller, "first");

    let task = controller.task(Action::SubmitWave);
    controller.set_draft_message("edited while pending");
    let update = task.await;
    assert!(matches!(update, Update::WaveSent), "{update:?}");
    assert_eq!(portal.sent(), vec![("first".to_string(), WAVE_GAS_LIMIT)]);

    controller.apply(update);
    assert!(!controller.state().is_composing());
    assert_eq!(controller.state().draft_message, "");
}

#[tokio::test]
async fn wallet_handle_is_shared() {
    let portal = MockPortal::new();
    let wallet = Arc::new(MockWallet::new(portal.clone()).with_authorized([ALICE]));
    let mut controller = Controller::new(Some(wallet.clone()));
    composing(&mut controller, "hey");

    controller.submit_wave().await;
    assert!(Arc::ptr_eq(wallet.portal(), &portal));
    assert_eq!(portal.sent().len(), 1);
}
