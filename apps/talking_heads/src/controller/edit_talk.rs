//! Edit session for one talk, including the removal confirmation dialog.

use shared::domain::{Talk, TalkId};
use tracing::debug;

use crate::controller::{effect::Effect, identified::Identified, Reducer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTalkState {
    pub talk: Talk,
    pub confirmation: Option<RemovalConfirmation>,
}

impl EditTalkState {
    pub fn new(talk: Talk) -> Self {
        Self {
            talk,
            confirmation: None,
        }
    }

    pub fn is_confirming_removal(&self) -> bool {
        self.confirmation.is_some()
    }
}

impl Identified for EditTalkState {
    type Id = TalkId;

    fn id(&self) -> TalkId {
        self.talk.id
    }
}

/// Pending "delete this talk?" dialog. Holds the title as it was when removal
/// was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalConfirmation {
    pub title: String,
}

impl RemovalConfirmation {
    pub fn message(&self) -> String {
        format!("Are you sure to delete {}?", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTalkAction {
    UpdateTalk(Talk),
    /// Row intent to open the editor; handled by the list.
    EditButtonTapped,
    RequestRemoval,
    Confirmation(ConfirmationAction),
    Done,
    Delegate(EditTalkDelegate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAction {
    Confirm,
    Cancel,
}

/// Events meant for the presenting feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTalkDelegate {
    RemovalConfirmed(TalkId),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EditTalk;

impl Reducer for EditTalk {
    type State = EditTalkState;
    type Action = EditTalkAction;

    fn reduce(&self, state: &mut EditTalkState, action: EditTalkAction) -> Effect<EditTalkAction> {
        match action {
            EditTalkAction::UpdateTalk(talk) => {
                let id = state.talk.id;
                if talk.id != id {
                    debug!(%id, ignored = %talk.id, "talk id is immutable; keeping session id");
                }
                state.talk = Talk { id, ..talk };
                Effect::none()
            }
            EditTalkAction::EditButtonTapped => Effect::none(),
            EditTalkAction::RequestRemoval => {
                state.confirmation = Some(RemovalConfirmation {
                    title: state.talk.title.clone(),
                });
                Effect::none()
            }
            EditTalkAction::Confirmation(_) if state.confirmation.is_none() => {
                debug!(id = %state.talk.id, "no removal pending; ignoring confirmation");
                Effect::none()
            }
            EditTalkAction::Confirmation(ConfirmationAction::Cancel) => {
                state.confirmation = None;
                Effect::none()
            }
            EditTalkAction::Confirmation(ConfirmationAction::Confirm) => {
                state.confirmation = None;
                // The delegate event has to reach the parent before the dismissal.
                Effect::batch(vec![
                    Effect::send(EditTalkAction::Delegate(
                        EditTalkDelegate::RemovalConfirmed(state.talk.id),
                    )),
                    Effect::Dismiss,
                ])
            }
            EditTalkAction::Done => Effect::Dismiss,
            EditTalkAction::Delegate(_) => Effect::none(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/edit_talk_tests.rs"]
mod tests;
