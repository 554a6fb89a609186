//! Store runtime: one action queue per root feature, processed in order by a
//! single task. Effects run on their own tasks and post actions back.

use std::collections::VecDeque;

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

use crate::{
    backend_bridge::tasks::TaskRegistry,
    controller::{effect::Effect, Reducer},
};

const ACTION_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("store is no longer processing actions")]
pub struct StoreStopped;

/// Handle to a running store. The loop stops, aborting its running effects,
/// once this handle and every [`Store::sender`] clone are dropped.
pub struct Store<R: Reducer> {
    actions: mpsc::Sender<R::Action>,
    state: watch::Receiver<R::State>,
}

impl<R: Reducer> Store<R> {
    /// Starts processing actions for `reducer` on the current tokio runtime.
    pub fn spawn(reducer: R, initial: R::State) -> Self {
        let (actions, inbox) = mpsc::channel(ACTION_QUEUE_CAPACITY);
        let (published, state) = watch::channel(initial.clone());
        tokio::spawn(run_loop(
            reducer,
            initial,
            inbox,
            actions.downgrade(),
            published,
        ));
        info!("store started");
        Self { actions, state }
    }

    pub async fn send(&self, action: R::Action) -> Result<(), StoreStopped> {
        self.actions.send(action).await.map_err(|_| StoreStopped)
    }

    /// Queue handle for front-ends that must not block.
    pub fn sender(&self) -> mpsc::Sender<R::Action> {
        self.actions.clone()
    }

    pub fn state(&self) -> R::State {
        self.state.borrow().clone()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<R::State> {
        self.state.clone()
    }

    /// Resolves with the first published state matching `predicate`,
    /// including the current one.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&R::State) -> bool,
    ) -> Result<R::State, StoreStopped> {
        let mut state = self.state.clone();
        let matched = state.wait_for(predicate).await.map_err(|_| StoreStopped)?;
        Ok(matched.clone())
    }
}

async fn run_loop<R: Reducer>(
    reducer: R,
    mut state: R::State,
    mut inbox: mpsc::Receiver<R::Action>,
    outbox: mpsc::WeakSender<R::Action>,
    published: watch::Sender<R::State>,
) {
    let mut tasks = TaskRegistry::default();
    let mut pending = VecDeque::new();

    loop {
        // Actions fed back by effects go before anything queued from outside.
        let action = match pending.pop_front() {
            Some(action) => action,
            None => match inbox.recv().await {
                Some(action) => action,
                None => break,
            },
        };

        let effect = reducer.reduce(&mut state, action);
        published.send_replace(state.clone());
        execute(effect, &mut pending, &mut tasks, &outbox);
    }

    info!("store stopped");
}

fn execute<A: Send + 'static>(
    effect: Effect<A>,
    pending: &mut VecDeque<A>,
    tasks: &mut TaskRegistry,
    outbox: &mpsc::WeakSender<A>,
) {
    match effect {
        Effect::None => {}
        Effect::Send(action) => pending.push_back(action),
        Effect::Batch(effects) => {
            for effect in effects {
                execute(effect, pending, tasks, outbox);
            }
        }
        Effect::Run { cancel_id, task } => {
            let outbox = outbox.clone();
            let handle = tokio::spawn(async move {
                let Some(action) = task.await else {
                    return;
                };
                if let Some(outbox) = outbox.upgrade() {
                    let _ = outbox.send(action).await;
                }
            });
            tasks.track(cancel_id, handle);
        }
        Effect::Subscribe {
            cancel_id,
            mut stream,
        } => {
            if tasks.running(cancel_id) > 0 {
                debug!(?cancel_id, "replacing running subscription");
            }
            tasks.cancel(cancel_id);
            let outbox = outbox.clone();
            let handle = tokio::spawn(async move {
                while let Some(action) = stream.next().await {
                    let Some(outbox) = outbox.upgrade() else {
                        break;
                    };
                    if outbox.send(action).await.is_err() {
                        break;
                    }
                }
                debug!(?cancel_id, "subscription finished");
            });
            tasks.track(Some(cancel_id), handle);
        }
        Effect::Cancel(id) => tasks.cancel(id),
        Effect::Dismiss => debug!("dismissal requested by a feature that was not presented"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
