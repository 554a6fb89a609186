//! Fakes and helpers shared by the controller and runtime tests.

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use client_core::{Result, TalkClient};
use futures::stream::{BoxStream, StreamExt};
use shared::{
    domain::{IncrementingIdGenerator, Talk, TalkId},
    error::StoreError,
};
use tokio::sync::{mpsc, Mutex, Notify};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::controller::effect::Effect;

pub(crate) fn talk(id: u128, title: &str, score: u8) -> Talk {
    Talk::new(TalkId::from_u128(id))
        .with_title(title)
        .with_score(score)
}

pub(crate) fn incrementing_ids() -> Arc<IncrementingIdGenerator> {
    Arc::new(IncrementingIdGenerator::default())
}

pub(crate) struct TestTalkClient {
    suggestion: Result<String>,
    load_result: Result<()>,
    save_result: Result<()>,
    fetch_gate: Option<Arc<Notify>>,
    save_gate: Option<Arc<Notify>>,
    saved: Arc<Mutex<Vec<Vec<Talk>>>>,
    load_calls: Arc<Mutex<u32>>,
    updates: StdMutex<Option<mpsc::UnboundedReceiver<Vec<Talk>>>>,
}

impl TestTalkClient {
    /// A client whose calls all succeed. The returned sender feeds the talk
    /// stream.
    pub(crate) fn ok() -> (Self, mpsc::UnboundedSender<Vec<Talk>>) {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let client = Self {
            suggestion: Ok("Suggested title".to_string()),
            load_result: Ok(()),
            save_result: Ok(()),
            fetch_gate: None,
            save_gate: None,
            saved: Arc::new(Mutex::new(Vec::new())),
            load_calls: Arc::new(Mutex::new(0)),
            updates: StdMutex::new(Some(updates_rx)),
        };
        (client, updates_tx)
    }

    pub(crate) fn with_suggestion(mut self, suggestion: Result<String>) -> Self {
        self.suggestion = suggestion;
        self
    }

    pub(crate) fn with_load_result(mut self, result: Result<()>) -> Self {
        self.load_result = result;
        self
    }

    pub(crate) fn with_save_result(mut self, result: Result<()>) -> Self {
        self.save_result = result;
        self
    }

    /// `fetch_suggested` waits for the gate to be notified before answering.
    pub(crate) fn with_fetch_gate(mut self, gate: Arc<Notify>) -> Self {
        self.fetch_gate = Some(gate);
        self
    }

    /// `save` records its payload immediately but waits for the gate before
    /// answering.
    pub(crate) fn with_save_gate(mut self, gate: Arc<Notify>) -> Self {
        self.save_gate = Some(gate);
        self
    }

    pub(crate) fn saved(&self) -> Arc<Mutex<Vec<Vec<Talk>>>> {
        Arc::clone(&self.saved)
    }

    pub(crate) fn load_calls(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.load_calls)
    }
}

#[async_trait]
impl TalkClient for TestTalkClient {
    async fn fetch_suggested(&self) -> Result<String> {
        if let Some(gate) = &self.fetch_gate {
            gate.notified().await;
        }
        self.suggestion.clone()
    }

    fn talks_stream(&self) -> BoxStream<'static, Vec<Talk>> {
        let receiver = self
            .updates
            .lock()
            .expect("updates lock")
            .take()
            .expect("talk stream subscribed twice");
        UnboundedReceiverStream::new(receiver).boxed()
    }

    async fn load(&self) -> Result<()> {
        *self.load_calls.lock().await += 1;
        self.load_result.clone()
    }

    async fn save(&self, talks: Vec<Talk>) -> Result<()> {
        self.saved.lock().await.push(talks);
        if let Some(gate) = &self.save_gate {
            gate.notified().await;
        }
        self.save_result.clone()
    }
}

pub(crate) fn test_error(message: &str) -> StoreError {
    StoreError::transient(message)
}

/// Runs an effect to completion outside a store: returns the actions it sends
/// synchronously followed by the outputs of its async tasks, in order.
/// Subscriptions, cancellations and dismissals are skipped.
pub(crate) async fn drain<A: Send + 'static>(effect: Effect<A>) -> Vec<A> {
    let mut actions = Vec::new();
    let mut queue = vec![effect];
    while let Some(effect) = queue.pop() {
        match effect {
            Effect::Send(action) => actions.push(action),
            Effect::Batch(effects) => queue.extend(effects.into_iter().rev()),
            Effect::Run { task, .. } => actions.extend(task.await),
            Effect::None | Effect::Subscribe { .. } | Effect::Cancel(_) | Effect::Dismiss => {}
        }
    }
    actions
}
