//! The talk list: owns every edit session, the presented modal, and the
//! subscription to the talk store.

use std::sync::Arc;

use client_core::TalkClient;
use futures::StreamExt;
use shared::{
    domain::{IdGenerator, Talk, TalkId},
    error::StoreError,
};
use tracing::{debug, info};

use crate::controller::{
    add_talk::{AddTalk, AddTalkAction, AddTalkState},
    edit_talk::{EditTalk, EditTalkAction, EditTalkDelegate, EditTalkState},
    effect::{CancelId, Effect},
    identified::IdentifiedVec,
    Reducer,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkListState {
    pub talks: IdentifiedVec<EditTalkState>,
    pub is_loading: bool,
    pub destination: Option<Destination>,
    /// Set by the first `Start`; the store stream is consumed only once.
    pub is_subscribed: bool,
}

impl Default for TalkListState {
    fn default() -> Self {
        Self {
            talks: IdentifiedVec::new(),
            // Nothing has arrived from the store yet.
            is_loading: true,
            destination: None,
            is_subscribed: false,
        }
    }
}

impl TalkListState {
    pub fn with_talks(talks: impl IntoIterator<Item = Talk>) -> Self {
        Self {
            talks: talks.into_iter().map(EditTalkState::new).collect(),
            ..Self::default()
        }
    }

    /// The talks in list order, as the store sees them.
    pub fn talk_values(&self) -> Vec<Talk> {
        self.talks.iter().map(|row| row.talk.clone()).collect()
    }

    pub fn prepared_talks(&self) -> impl Iterator<Item = &EditTalkState> {
        self.talks.iter().filter(|row| !row.talk.is_given())
    }

    pub fn given_talks(&self) -> impl Iterator<Item = &EditTalkState> {
        self.talks.iter().filter(|row| row.talk.is_given())
    }
}

/// The single modal slot of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Add(AddTalkState),
    Edit(EditTalkState),
    Alert(AlertState),
}

impl Destination {
    /// The talk session this destination belongs to, if any.
    pub fn session_id(&self) -> Option<TalkId> {
        match self {
            Self::Add(add) => Some(add.id()),
            Self::Edit(edit) => Some(edit.talk.id),
            Self::Alert(_) => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Edit(_) => "edit",
            Self::Alert(_) => "alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertState {
    pub title: String,
    pub message: String,
}

impl AlertState {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            title: "An error occurred".to_string(),
            message: message.into(),
        }
    }
}

/// Actions addressed to the presented feature. The id names the session the
/// action was meant for so that late results for a closed session are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationAction {
    Add(TalkId, AddTalkAction),
    Edit(TalkId, EditTalkAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationAction {
    Presented(DestinationAction),
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TalkListAction {
    Start,
    AddButtonTapped,
    LoadButtonTapped,
    SaveButtonTapped,
    ClearButtonTapped,
    TalksUpdated(Vec<Talk>),
    Talks { id: TalkId, action: EditTalkAction },
    Destination(PresentationAction),
    Failure(StoreError),
}

impl TalkListAction {
    pub fn add(id: TalkId, action: AddTalkAction) -> Self {
        Self::Destination(PresentationAction::Presented(DestinationAction::Add(
            id, action,
        )))
    }

    pub fn edit(id: TalkId, action: EditTalkAction) -> Self {
        Self::Destination(PresentationAction::Presented(DestinationAction::Edit(
            id, action,
        )))
    }

    pub fn dismiss() -> Self {
        Self::Destination(PresentationAction::Dismiss)
    }
}

pub struct TalkList {
    client: Arc<dyn TalkClient>,
    ids: Arc<dyn IdGenerator>,
    add: AddTalk,
    edit: EditTalk,
}

impl TalkList {
    pub fn new(client: Arc<dyn TalkClient>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            add: AddTalk::new(Arc::clone(&client)),
            edit: EditTalk,
            client,
            ids,
        }
    }

    /// Replaces whatever is presented, cancelling the work of the old session.
    fn present(state: &mut TalkListState, destination: Destination) -> Effect<TalkListAction> {
        debug!(destination = destination.name(), "presenting");
        let previous = state.destination.replace(destination);
        Self::cancel_session_of(previous)
    }

    fn dismiss(state: &mut TalkListState) -> Effect<TalkListAction> {
        let previous = state.destination.take();
        if let Some(destination) = &previous {
            debug!(destination = destination.name(), "dismissed");
        }
        Self::cancel_session_of(previous)
    }

    fn cancel_session_of(destination: Option<Destination>) -> Effect<TalkListAction> {
        match destination.and_then(|destination| destination.session_id()) {
            Some(id) => Effect::cancel(CancelId::Session(id)),
            None => Effect::none(),
        }
    }

    fn reduce_row(
        &self,
        state: &mut TalkListState,
        id: TalkId,
        action: EditTalkAction,
    ) -> Effect<TalkListAction> {
        let Some(row) = state.talks.get_mut(id) else {
            debug!(%id, "action for a talk that is no longer listed");
            return Effect::none();
        };
        let delegate = match &action {
            EditTalkAction::Delegate(delegate) => Some(*delegate),
            _ => None,
        };
        let opens_editor = matches!(action, EditTalkAction::EditButtonTapped);

        let effect = self.edit.reduce(row, action);
        row.talk = row.talk.clone().committed();
        let session = row.clone();

        if opens_editor {
            if let Some(open) = &state.destination {
                debug!(%id, open = open.name(), "a destination is already presented");
            } else {
                state.destination = Some(Destination::Edit(EditTalkState::new(session.talk)));
            }
        }
        if let Some(EditTalkDelegate::RemovalConfirmed(removed)) = delegate {
            state.talks.remove(removed);
            info!(id = %removed, "talk removed");
        }

        effect
            .without_dismiss()
            .map(move |action| TalkListAction::Talks { id, action })
    }

    fn reduce_destination(
        &self,
        state: &mut TalkListState,
        action: DestinationAction,
    ) -> Effect<TalkListAction> {
        match action {
            DestinationAction::Add(id, action) => self.reduce_add(state, id, action),
            DestinationAction::Edit(id, action) => self.reduce_edit(state, id, action),
        }
    }

    fn reduce_add(
        &self,
        state: &mut TalkListState,
        id: TalkId,
        action: AddTalkAction,
    ) -> Effect<TalkListAction> {
        let add = match state.destination.as_mut() {
            Some(Destination::Add(add)) if add.id() == id => add,
            _ => {
                debug!(%id, ?action, "dropping action for an add session that is not presented");
                return Effect::none();
            }
        };
        let confirmed = matches!(action, AddTalkAction::ConfirmAdd) && add.can_confirm();

        let effect = self.add.reduce(add, action);
        let added = confirmed.then(|| add.talk.clone());

        if let Some(talk) = added {
            let appended = state.talks.upsert(EditTalkState::new(talk.committed()));
            info!(%id, appended, "talk added");
        }

        effect
            .map(move |action| TalkListAction::add(id, action))
            .dismiss_into(TalkListAction::dismiss)
    }

    fn reduce_edit(
        &self,
        state: &mut TalkListState,
        id: TalkId,
        action: EditTalkAction,
    ) -> Effect<TalkListAction> {
        let edit = match state.destination.as_mut() {
            Some(Destination::Edit(edit)) if edit.talk.id == id => edit,
            _ => {
                debug!(%id, ?action, "dropping action for an edit session that is not presented");
                return Effect::none();
            }
        };
        let delegate = match &action {
            EditTalkAction::Delegate(delegate) => Some(*delegate),
            _ => None,
        };
        let done = matches!(action, EditTalkAction::Done);

        let effect = self.edit.reduce(edit, action);
        let edited = done.then(|| edit.talk.clone());

        if let Some(talk) = edited {
            match state.talks.get_mut(id) {
                Some(row) => row.talk = talk.committed(),
                None => debug!(%id, "edited talk is no longer listed; dropping edits"),
            }
        }
        if let Some(EditTalkDelegate::RemovalConfirmed(removed)) = delegate {
            state.talks.remove(removed);
            info!(id = %removed, "talk removed");
        }

        effect
            .map(move |action| TalkListAction::edit(id, action))
            .dismiss_into(TalkListAction::dismiss)
    }
}

impl Reducer for TalkList {
    type State = TalkListState;
    type Action = TalkListAction;

    fn reduce(&self, state: &mut TalkListState, action: TalkListAction) -> Effect<TalkListAction> {
        match action {
            TalkListAction::Start => {
                if state.is_subscribed {
                    debug!("already subscribed to talk updates; ignoring start");
                    return Effect::none();
                }
                state.is_subscribed = true;
                info!("subscribing to talk updates");
                Effect::subscribe(
                    CancelId::TalkStream,
                    self.client
                        .talks_stream()
                        .map(TalkListAction::TalksUpdated),
                )
            }
            TalkListAction::AddButtonTapped => {
                if let Some(open) = &state.destination {
                    debug!(open = open.name(), "a destination is already presented");
                    return Effect::none();
                }
                state.destination = Some(Destination::Add(AddTalkState::new(self.ids.next_id())));
                Effect::none()
            }
            TalkListAction::LoadButtonTapped => {
                // Cleared by the next stream emission or by a failure.
                state.is_loading = true;
                let client = Arc::clone(&self.client);
                Effect::run(None, async move {
                    client.load().await.err().map(TalkListAction::Failure)
                })
            }
            TalkListAction::SaveButtonTapped => {
                let talks = state.talk_values();
                debug!(talks = talks.len(), "saving talks");
                let client = Arc::clone(&self.client);
                Effect::run(None, async move {
                    client.save(talks).await.err().map(TalkListAction::Failure)
                })
            }
            TalkListAction::ClearButtonTapped => {
                state.talks.clear();
                Effect::none()
            }
            TalkListAction::TalksUpdated(talks) => {
                debug!(talks = talks.len(), "talks updated from store");
                state.talks = talks
                    .into_iter()
                    .map(|talk| EditTalkState::new(talk.committed()))
                    .collect();
                state.is_loading = false;
                Effect::none()
            }
            TalkListAction::Talks { id, action } => self.reduce_row(state, id, action),
            TalkListAction::Destination(PresentationAction::Presented(action)) => {
                self.reduce_destination(state, action)
            }
            TalkListAction::Destination(PresentationAction::Dismiss) => Self::dismiss(state),
            TalkListAction::Failure(err) if err.is_cancelled() => {
                debug!("request cancelled");
                Effect::none()
            }
            TalkListAction::Failure(err) => {
                info!(error = %err, "store request failed");
                state.is_loading = false;
                Self::present(state, Destination::Alert(AlertState::failure(err.to_string())))
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/talk_list_tests.rs"]
mod tests;
