//! Creation session for a new talk.

use std::sync::Arc;

use client_core::TalkClient;
use shared::{
    domain::{Talk, TalkId},
    error::StoreError,
};
use tracing::{debug, warn};

use crate::controller::{
    effect::{CancelId, Effect},
    Reducer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTalkState {
    pub talk: Talk,
    pub is_fetching: bool,
}

impl AddTalkState {
    pub fn new(id: TalkId) -> Self {
        Self {
            talk: Talk::new(id),
            is_fetching: false,
        }
    }

    pub fn id(&self) -> TalkId {
        self.talk.id
    }

    /// Whether "Add" does anything. A blank title is not worth a row.
    pub fn can_confirm(&self) -> bool {
        !self.talk.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTalkAction {
    UpdateTalk(Talk),
    FetchSuggestedTitle,
    FetchResult(Result<String, StoreError>),
    ConfirmAdd,
}

pub struct AddTalk {
    client: Arc<dyn TalkClient>,
}

impl AddTalk {
    pub fn new(client: Arc<dyn TalkClient>) -> Self {
        Self { client }
    }
}

impl Reducer for AddTalk {
    type State = AddTalkState;
    type Action = AddTalkAction;

    fn reduce(&self, state: &mut AddTalkState, action: AddTalkAction) -> Effect<AddTalkAction> {
        match action {
            AddTalkAction::UpdateTalk(talk) => {
                let id = state.talk.id;
                if talk.id != id {
                    debug!(%id, ignored = %talk.id, "talk id is immutable; keeping session id");
                }
                state.talk = Talk { id, ..talk };
                Effect::none()
            }
            AddTalkAction::FetchSuggestedTitle => {
                if state.is_fetching {
                    return Effect::none();
                }
                state.is_fetching = true;
                let client = Arc::clone(&self.client);
                Effect::run(Some(CancelId::Session(state.id())), async move {
                    Some(AddTalkAction::FetchResult(client.fetch_suggested().await))
                })
            }
            AddTalkAction::FetchResult(Ok(title)) => {
                state.talk.title = title;
                state.is_fetching = false;
                Effect::none()
            }
            AddTalkAction::FetchResult(Err(err)) => {
                // Suggestions are best effort; the user can still type a title.
                warn!(error = %err, "title suggestion failed");
                state.is_fetching = false;
                Effect::none()
            }
            AddTalkAction::ConfirmAdd => {
                if !state.can_confirm() {
                    debug!(id = %state.id(), "ignoring add with blank title");
                    return Effect::none();
                }
                Effect::Dismiss
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/add_talk_tests.rs"]
mod tests;
