//! Resolves user intents against the current list state and queues the
//! resulting actions on the store.

use chrono::NaiveDate;
use shared::domain::{Talk, TalkId};
use tokio::sync::mpsc::{error::TrySendError, Sender};

use crate::controller::{
    add_talk::AddTalkAction,
    edit_talk::{ConfirmationAction, EditTalkAction},
    events::UserIntent,
    talk_list::{Destination, TalkListAction, TalkListState},
};

/// Talk ids in display order: prepared talks first, then given ones.
pub fn rows_in_display_order(state: &TalkListState) -> Vec<TalkId> {
    state
        .prepared_talks()
        .chain(state.given_talks())
        .map(|row| row.talk.id)
        .collect()
}

/// Turns an intent into the action to send, or into a status line explaining
/// why nothing can be sent right now.
pub fn resolve_intent(
    intent: UserIntent,
    state: &TalkListState,
    today: NaiveDate,
) -> Result<TalkListAction, String> {
    match intent {
        UserIntent::Add => Ok(TalkListAction::AddButtonTapped),
        UserIntent::Load => Ok(TalkListAction::LoadButtonTapped),
        UserIntent::Save => Ok(TalkListAction::SaveButtonTapped),
        UserIntent::Clear => Ok(TalkListAction::ClearButtonTapped),
        UserIntent::Edit(number) => Ok(TalkListAction::Talks {
            id: row_at(state, number)?,
            action: EditTalkAction::EditButtonTapped,
        }),
        UserIntent::Rate(number, score) => {
            let id = row_at(state, number)?;
            let talk = state
                .talks
                .get(id)
                .map(|row| row.talk.clone().with_score(score))
                .ok_or_else(|| format!("No talk number {number}"))?;
            Ok(TalkListAction::Talks {
                id,
                action: EditTalkAction::UpdateTalk(talk),
            })
        }
        UserIntent::Title(title) => update_open_talk(state, |talk| talk.title = title),
        UserIntent::Score(score) => update_open_talk(state, |talk| talk.score = score),
        UserIntent::Given(given) => {
            update_open_talk(state, |talk| talk.given_date = given.resolve(today))
        }
        UserIntent::FetchTitle => match &state.destination {
            Some(Destination::Add(add)) if add.is_fetching => {
                Err("Already fetching a title".to_string())
            }
            Some(Destination::Add(add)) => Ok(TalkListAction::add(
                add.id(),
                AddTalkAction::FetchSuggestedTitle,
            )),
            _ => Err("Titles can only be fetched while adding a talk".to_string()),
        },
        UserIntent::ConfirmAdd => match &state.destination {
            Some(Destination::Add(add)) if !add.can_confirm() => {
                Err("Add is disabled until the talk has a title".to_string())
            }
            Some(Destination::Add(add)) => {
                Ok(TalkListAction::add(add.id(), AddTalkAction::ConfirmAdd))
            }
            _ => Err("No talk is being added".to_string()),
        },
        UserIntent::Done => match &state.destination {
            Some(Destination::Edit(edit)) if edit.talk.title.trim().is_empty() => {
                Err("Done is disabled until the talk has a title".to_string())
            }
            Some(Destination::Edit(edit)) => {
                Ok(TalkListAction::edit(edit.talk.id, EditTalkAction::Done))
            }
            _ => Err("No talk is being edited".to_string()),
        },
        UserIntent::Remove => match &state.destination {
            Some(Destination::Edit(edit)) => Ok(TalkListAction::edit(
                edit.talk.id,
                EditTalkAction::RequestRemoval,
            )),
            _ => Err("No talk is being edited".to_string()),
        },
        UserIntent::ConfirmRemoval => confirm_removal(state, ConfirmationAction::Confirm),
        UserIntent::CancelRemoval => confirm_removal(state, ConfirmationAction::Cancel),
        UserIntent::Dismiss => match &state.destination {
            None => Err("Nothing to dismiss".to_string()),
            Some(Destination::Edit(_)) => Err("Use done to close the editor".to_string()),
            Some(_) => Ok(TalkListAction::dismiss()),
        },
        UserIntent::Show | UserIntent::Help | UserIntent::Quit => {
            Err("Handled by the front-end".to_string())
        }
    }
}

fn row_at(state: &TalkListState, number: usize) -> Result<TalkId, String> {
    number
        .checked_sub(1)
        .and_then(|index| rows_in_display_order(state).get(index).copied())
        .ok_or_else(|| format!("No talk number {number}"))
}

fn update_open_talk(
    state: &TalkListState,
    edit: impl FnOnce(&mut Talk),
) -> Result<TalkListAction, String> {
    match &state.destination {
        Some(Destination::Add(add)) => {
            let mut talk = add.talk.clone();
            edit(&mut talk);
            Ok(TalkListAction::add(add.id(), AddTalkAction::UpdateTalk(talk)))
        }
        Some(Destination::Edit(session)) => {
            let mut talk = session.talk.clone();
            edit(&mut talk);
            Ok(TalkListAction::edit(
                session.talk.id,
                EditTalkAction::UpdateTalk(talk),
            ))
        }
        _ => Err("Open a talk with add or edit first".to_string()),
    }
}

fn confirm_removal(
    state: &TalkListState,
    action: ConfirmationAction,
) -> Result<TalkListAction, String> {
    match &state.destination {
        Some(Destination::Edit(edit)) if edit.is_confirming_removal() => Ok(TalkListAction::edit(
            edit.talk.id,
            EditTalkAction::Confirmation(action),
        )),
        _ => Err("No removal is waiting for confirmation".to_string()),
    }
}

pub fn dispatch_action(
    actions: &Sender<TalkListAction>,
    action: TalkListAction,
    status: &mut String,
) {
    let action_name = action_name(&action);

    match actions.try_send(action) {
        Ok(()) => tracing::debug!(action = action_name, "queued ui->store action"),
        Err(TrySendError::Full(_)) => {
            *status = "Action queue is full; please retry".to_string();
        }
        Err(TrySendError::Closed(_)) => {
            *status = "Store stopped processing actions; restart the app".to_string();
        }
    }
}

fn action_name(action: &TalkListAction) -> &'static str {
    match action {
        TalkListAction::Start => "start",
        TalkListAction::AddButtonTapped => "add",
        TalkListAction::LoadButtonTapped => "load",
        TalkListAction::SaveButtonTapped => "save",
        TalkListAction::ClearButtonTapped => "clear",
        TalkListAction::TalksUpdated(_) => "talks_updated",
        TalkListAction::Talks { .. } => "row",
        TalkListAction::Destination(_) => "destination",
        TalkListAction::Failure(_) => "failure",
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
