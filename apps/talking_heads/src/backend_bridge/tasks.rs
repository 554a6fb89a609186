//! Bookkeeping for effect tasks so that they can be cancelled by id.

use std::collections::HashMap;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::controller::effect::CancelId;

#[derive(Default)]
pub(crate) struct TaskRegistry {
    cancellable: HashMap<CancelId, Vec<JoinHandle<()>>>,
    detached: Vec<JoinHandle<()>>,
}

impl TaskRegistry {
    pub(crate) fn track(&mut self, cancel_id: Option<CancelId>, handle: JoinHandle<()>) {
        self.prune_finished();
        match cancel_id {
            Some(id) => self.cancellable.entry(id).or_default().push(handle),
            None => self.detached.push(handle),
        }
    }

    pub(crate) fn cancel(&mut self, id: CancelId) {
        let Some(handles) = self.cancellable.remove(&id) else {
            return;
        };
        let running = handles.iter().filter(|handle| !handle.is_finished()).count();
        for handle in handles {
            handle.abort();
        }
        if running > 0 {
            debug!(?id, running, "cancelled effects");
        }
    }

    pub(crate) fn running(&self, id: CancelId) -> usize {
        self.cancellable
            .get(&id)
            .map(|handles| handles.iter().filter(|handle| !handle.is_finished()).count())
            .unwrap_or(0)
    }

    fn prune_finished(&mut self) {
        self.detached.retain(|handle| !handle.is_finished());
        self.cancellable.retain(|_, handles| {
            handles.retain(|handle| !handle.is_finished());
            !handles.is_empty()
        });
    }
}

impl Drop for TaskRegistry {
    fn drop(&mut self) {
        for handle in self
            .cancellable
            .drain()
            .flat_map(|(_, handles)| handles)
            .chain(self.detached.drain(..))
        {
            handle.abort();
        }
    }
}
