use super::*;
use std::{future::Future, sync::Arc, time::Duration};

use client_core::TalkClient;
use tokio::{sync::Notify, time::timeout};

use crate::{
    controller::{
        add_talk::AddTalkAction,
        edit_talk::{ConfirmationAction, EditTalkAction},
        talk_list::{Destination, TalkList, TalkListAction, TalkListState},
    },
    test_support::{incrementing_ids, talk, test_error, TestTalkClient},
};
use shared::domain::TalkId;

const WAIT: Duration = Duration::from_secs(5);

async fn within<T>(future: impl Future<Output = T>) -> T {
    timeout(WAIT, future).await.expect("timed out waiting for the store")
}

async fn settle(
    store: &Store<TalkList>,
    predicate: impl FnMut(&TalkListState) -> bool,
) -> TalkListState {
    within(store.wait_for(predicate)).await.expect("store running")
}

fn spawn(client: TestTalkClient, initial: TalkListState) -> Store<TalkList> {
    Store::spawn(TalkList::new(Arc::new(client), incrementing_ids()), initial)
}

#[tokio::test]
async fn store_emissions_replace_the_list() {
    let (client, updates) = TestTalkClient::ok();
    let store = spawn(client, TalkListState::default());
    store.send(TalkListAction::Start).await.expect("send");

    updates
        .send(vec![talk(1, "A", 3), talk(2, "B", 4)])
        .expect("stream open");
    let state = settle(&store, |state| state.talks.len() == 2).await;
    assert!(!state.is_loading);

    updates.send(vec![talk(1, "A", 3)]).expect("stream open");
    let state = settle(&store, |state| state.talks.len() == 1).await;
    assert_eq!(state.talk_values(), vec![talk(1, "A", 3)]);
}

#[tokio::test]
async fn repeated_start_keeps_receiving_updates() {
    let (client, updates) = TestTalkClient::ok();
    let store = spawn(client, TalkListState::default());
    store.send(TalkListAction::Start).await.expect("send");
    store.send(TalkListAction::Start).await.expect("send");

    updates.send(vec![talk(1, "A", 3)]).expect("stream open");
    settle(&store, |state| state.talks.len() == 1).await;

    updates
        .send(vec![talk(1, "A", 3), talk(2, "B", 4)])
        .expect("stream still open after second start");
    settle(&store, |state| state.talks.len() == 2).await;
}

#[tokio::test]
async fn store_stops_once_every_sender_is_gone() {
    let (client, updates) = TestTalkClient::ok();
    let store = spawn(client, TalkListState::default());
    store.send(TalkListAction::Start).await.expect("send");
    let mut states = store.subscribe_state();
    within(states.changed()).await.expect("start processed");

    let sender = store.sender();
    drop(store);
    sender
        .send(TalkListAction::ClearButtonTapped)
        .await
        .expect("an outstanding sender keeps the store running");
    within(states.changed()).await.expect("clear processed");

    drop(sender);
    assert!(within(states.changed()).await.is_err());
    within(async {
        while !updates.is_closed() {
            tokio::task::yield_now().await;
        }
    })
    .await;
}

#[tokio::test]
async fn dismissing_the_add_sheet_cancels_its_fetch() {
    let gate = Arc::new(Notify::new());
    let (client, _updates) = TestTalkClient::ok();
    let client = Arc::new(client.with_fetch_gate(Arc::clone(&gate)));
    let store = Store::spawn(
        TalkList::new(Arc::clone(&client) as Arc<dyn TalkClient>, incrementing_ids()),
        TalkListState::default(),
    );
    let idle = Arc::strong_count(&client);
    let session = TalkId::from_u128(0);

    store.send(TalkListAction::AddButtonTapped).await.expect("send");
    store
        .send(TalkListAction::add(session, AddTalkAction::FetchSuggestedTitle))
        .await
        .expect("send");
    settle(&store, |state| {
        matches!(&state.destination, Some(Destination::Add(add)) if add.is_fetching)
    })
    .await;
    within(async {
        while Arc::strong_count(&client) == idle {
            tokio::task::yield_now().await;
        }
    })
    .await;

    store.send(TalkListAction::dismiss()).await.expect("send");
    settle(&store, |state| state.destination.is_none()).await;
    within(async {
        while Arc::strong_count(&client) > idle {
            tokio::task::yield_now().await;
        }
    })
    .await;

    gate.notify_waiters();
    store.send(TalkListAction::AddButtonTapped).await.expect("send");
    let state = settle(&store, |state| state.destination.is_some()).await;
    assert_eq!(
        state.destination.as_ref().and_then(Destination::session_id),
        Some(TalkId::from_u128(1))
    );
}

#[tokio::test]
async fn save_uses_the_list_from_when_it_was_requested() {
    let gate = Arc::new(Notify::new());
    let (client, _updates) = TestTalkClient::ok();
    let client = client.with_save_gate(Arc::clone(&gate));
    let saved = client.saved();
    let mut initial = TalkListState::with_talks([talk(1, "A", 3), talk(2, "B", 4)]);
    initial.is_loading = false;
    let store = spawn(client, initial);

    store.send(TalkListAction::SaveButtonTapped).await.expect("send");
    store.send(TalkListAction::ClearButtonTapped).await.expect("send");
    settle(&store, |state| state.talks.is_empty()).await;

    within(async {
        while saved.lock().await.is_empty() {
            tokio::task::yield_now().await;
        }
    })
    .await;
    gate.notify_one();

    assert_eq!(
        *saved.lock().await,
        vec![vec![talk(1, "A", 3), talk(2, "B", 4)]]
    );
    assert!(store.state().destination.is_none());
}

#[tokio::test]
async fn failed_save_presents_an_alert_until_dismissed() {
    let (client, _updates) = TestTalkClient::ok();
    let store = spawn(
        client.with_save_result(Err(test_error("Test Error"))),
        TalkListState::default(),
    );

    store.send(TalkListAction::SaveButtonTapped).await.expect("send");
    let state = settle(&store, |state| state.destination.is_some()).await;
    let Some(Destination::Alert(alert)) = state.destination else {
        panic!("expected an alert");
    };
    assert_eq!(alert.message, "Test Error");

    store.send(TalkListAction::dismiss()).await.expect("send");
    settle(&store, |state| state.destination.is_none()).await;
}

#[tokio::test]
async fn confirmed_removal_runs_before_the_editor_closes() {
    let (client, _updates) = TestTalkClient::ok();
    let store = spawn(
        client,
        TalkListState::with_talks([talk(1, "A", 3), talk(2, "B", 4)]),
    );
    let id = TalkId::from_u128(1);

    for action in [
        TalkListAction::Talks {
            id,
            action: EditTalkAction::EditButtonTapped,
        },
        TalkListAction::edit(id, EditTalkAction::RequestRemoval),
        TalkListAction::edit(
            id,
            EditTalkAction::Confirmation(ConfirmationAction::Confirm),
        ),
    ] {
        store.send(action).await.expect("send");
    }

    let state = settle(&store, |state| state.destination.is_none() && state.talks.len() == 1).await;
    assert_eq!(state.talk_values(), vec![talk(2, "B", 4)]);
}
