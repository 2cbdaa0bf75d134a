use crate::utils::*;
use tokio::time::timeout;
use waveportal::{Controller, SessionState, Wave};
use waveportal_test_utils::MockPortal;

#[tokio::test]
async fn loads_history_in_order() {
    let portal = MockPortal::with_waves([
        raw_wave(ALICE, 1_700_000_000, "hi"),
        raw_wave(BOB, 1_600_000_000, "yo"),
    ]);
    let mut controller = connected(&portal);

    controller.load_all_waves().await;
    let waves = &controller.state().waves;
    assert_eq!(waves.len(), 2);
    assert_eq!(waves[0].address, ALICE);
    assert_eq!(waves[0].message, "hi");
    assert_eq!(waves[0].timestamp.timestamp_millis(), 1_700_000_000_000);
    assert_eq!(waves[1].address, BOB);
    assert_eq!(waves[1].message, "yo");

    let cards = controller.page().cards;
    assert_eq!(cards[0].time, "Tue Nov 14 2023 22:13:20 GMT+0000");
}

#[tokio::test]
async fn loads_empty_history() {
    let portal = MockPortal::new();
    let mut controller = disconnected(&portal);

    controller.load_all_waves().await;
    assert!(controller.state().waves.is_empty());
}

#[tokio::test]
async fn load_replaces_existing_list() {
    let portal = MockPortal::with_waves([raw_wave(ALICE, 1, "old")]);
    let mut controller = connected(&portal);
    controller.load_all_waves().await;

    portal.set_waves([raw_wave(BOB, 2, "a"), raw_wave(ALICE, 3, "b")]);
    controller.load_all_waves().await;
    let messages: Vec<_> = controller.state().waves.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages, ["a", "b"]);
}

#[tokio::test]
async fn failed_load_keeps_list() {
    let portal = MockPortal::with_waves([raw_wave(ALICE, 1, "kept")]);
    let mut controller = connected(&portal);
    controller.load_all_waves().await;

    portal.fail_reads(true);
    controller.load_all_waves().await;
    assert_eq!(controller.state().waves.len(), 1);
    assert_eq!(controller.state().waves[0].message, "kept");
}

#[tokio::test]
async fn no_provider_is_inert() {
    let mut controller = Controller::new(None);
    controller.load_all_waves().await;
    controller.subscribe_to_new_waves().await;
    similar_asserts::assert_eq!(controller.state(), &SessionState::default());
    assert!(!controller.is_subscribed());

    // Nothing to wait for.
    assert!(timeout(QUIET_PERIOD, controller.next_new_wave()).await.is_err());
}

#[tokio::test]
async fn new_wave_appends_one_entry() {
    let portal = MockPortal::with_waves([raw_wave(ALICE, 1_600_000_000, "history")]);
    let mut controller = connected(&portal);
    controller.load_all_waves().await;
    controller.subscribe_to_new_waves().await;
    assert_eq!(portal.listener_count(), 1);

    let before = controller.state().waves.clone();
    assert_eq!(portal.emit(BOB, 1_700_000_000, "live"), 1);
    assert!(controller.next_new_wave().await);

    let waves = &controller.state().waves;
    assert_eq!(waves.len(), before.len() + 1);
    assert_eq!(&waves[..before.len()], &before[..]);
    let last = waves.last().unwrap();
    assert_eq!(last.address, BOB);
    assert_eq!(last.message, "live");
    assert_eq!(last.formatted_time(), "Tue Nov 14 2023 22:13:20 GMT+0000");
}

#[tokio::test]
async fn live_waves_keep_arrival_order() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    controller.subscribe_to_new_waves().await;

    portal.emit(ALICE, 30, "one");
    portal.emit(BOB, 10, "two");
    portal.emit(ALICE, 20, "three");
    for _ in 0..3 {
        assert!(controller.next_new_wave().await);
    }
    let messages: Vec<_> = controller.state().waves.iter().map(|w| w.message.as_str()).collect();
    assert_eq!(messages, ["one", "two", "three"]);
}

#[tokio::test]
async fn live_waves_are_not_deduplicated() {
    let portal = MockPortal::with_waves([raw_wave(ALICE, 5, "same")]);
    let mut controller = connected(&portal);
    controller.load_all_waves().await;
    controller.subscribe_to_new_waves().await;

    portal.emit(ALICE, 5, "same");
    assert!(controller.next_new_wave().await);

    let expected = Wave::from(raw_wave(ALICE, 5, "same"));
    similar_asserts::assert_eq!(controller.state().waves, vec![expected.clone(), expected]);
}

#[tokio::test]
async fn skips_undecodable_events() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    controller.subscribe_to_new_waves().await;

    assert_eq!(portal.emit_undecodable(), 1);
    assert!(!controller.next_new_wave().await);
    assert!(controller.state().waves.is_empty());
    assert!(controller.is_subscribed());

    portal.emit(BOB, 1, "after");
    assert!(controller.next_new_wave().await);
    assert_eq!(controller.state().waves.len(), 1);
}

#[tokio::test]
async fn closed_listener_ends_subscription() {
    let portal = MockPortal::new();
    let mut controller = connected(&portal);
    controller.subscribe_to_new_waves().await;

    portal.close_listeners();
    assert!(!controller.next_new_wave().await);
    assert!(!controller.is_subscribed());
    assert!(controller.state().waves.is_empty());
}

#[tokio::test]
async fn failed_subscribe_leaves_state() {
    let portal = MockPortal::new();
    portal.fail_subscribe(true);
    let mut controller = connected(&portal);

    controller.subscribe_to_new_waves().await;
    assert!(!controller.is_subscribed());
    assert_eq!(portal.listener_count(), 0);
}
