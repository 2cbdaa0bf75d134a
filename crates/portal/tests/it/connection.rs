use crate::utils::*;
use std::sync::Arc;
use waveportal::{Controller, INSTALL_WALLET_ALERT, SessionState};
use waveportal_test_utils::{MockPortal, MockWallet};

#[tokio::test]
async fn detects_authorized_account() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);

    controller.detect_existing_connection().await;
    assert_eq!(controller.state().connected_account, Some(ALICE));
    assert!(!controller.page().connect_button);
    assert_eq!(controller.alert(), None);
}

#[tokio::test]
async fn detects_first_of_many_accounts() {
    let wallet = MockWallet::new(MockPortal::new()).with_authorized([BOB, ALICE]);
    let mut controller = Controller::new(Some(wallet.into_provider()));

    controller.detect_existing_connection().await;
    assert_eq!(controller.state().connected_account, Some(BOB));
}

#[tokio::test]
async fn detect_without_authorized_account() {
    let portal = MockPortal::new();
    let mut controller = disconnected(&portal);

    controller.detect_existing_connection().await;
    similar_asserts::assert_eq!(controller.state(), &SessionState::default());
    assert!(controller.page().connect_button);
}

#[tokio::test]
async fn detect_without_provider() {
    let mut controller = Controller::new(None);
    controller.detect_existing_connection().await;
    similar_asserts::assert_eq!(controller.state(), &SessionState::default());
    assert_eq!(controller.alert(), None);
}

#[tokio::test]
async fn detect_failure_leaves_state() {
    let wallet = Arc::new(MockWallet::new(MockPortal::new()).with_authorized([ALICE]));
    wallet.fail_queries(true);
    let mut controller = Controller::new(Some(wallet.clone()));

    controller.detect_existing_connection().await;
    assert_eq!(wallet.account_queries(), 1);
    assert_eq!(controller.state().connected_account, None);
    assert_eq!(wallet.account_requests(), 0);
}

#[tokio::test]
async fn connect_grants_account() {
    let wallet = Arc::new(MockWallet::new(MockPortal::new()).with_grant([BOB]));
    let mut controller = Controller::new(Some(wallet.clone()));

    controller.connect_wallet().await;
    assert_eq!(wallet.account_requests(), 1);
    assert_eq!(controller.state().connected_account, Some(BOB));
    assert!(!controller.page().connect_button);

    // The grant is remembered for later silent queries.
    let mut reloaded = Controller::new(Some(wallet));
    reloaded.detect_existing_connection().await;
    assert_eq!(reloaded.state().connected_account, Some(BOB));
}

#[tokio::test]
async fn connect_rejected_by_user() {
    let wallet = Arc::new(MockWallet::new(MockPortal::new()).with_grant([BOB]));
    wallet.reject_requests(true);
    let mut controller = Controller::new(Some(wallet.clone()));

    controller.connect_wallet().await;
    assert_eq!(wallet.account_requests(), 1);
    assert_eq!(controller.state().connected_account, None);
    assert_eq!(controller.alert(), None);
}

#[tokio::test]
async fn connect_with_empty_grant() {
    let portal = MockPortal::new();
    let mut controller = disconnected(&portal);

    controller.connect_wallet().await;
    assert_eq!(controller.state().connected_account, None);
    assert_eq!(controller.alert(), None);
}

#[tokio::test]
async fn connect_without_provider_alerts() {
    let mut controller = Controller::new(None);

    controller.connect_wallet().await;
    assert_eq!(controller.alert(), Some(INSTALL_WALLET_ALERT));
    assert_eq!(controller.page().alert, Some("Get MetaMask!"));
    similar_asserts::assert_eq!(controller.state(), &SessionState::default());
}
