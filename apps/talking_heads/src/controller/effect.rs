//! Side effects returned by reducers and executed by the store runtime.

use std::{fmt, future::Future};

use futures::{
    future::BoxFuture,
    stream::{BoxStream, Stream},
    FutureExt, StreamExt,
};
use shared::domain::TalkId;

/// Handle used to cancel running effects as a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelId {
    /// The list's subscription to the store stream.
    TalkStream,
    /// Everything a presented add/edit session started.
    Session(TalkId),
}

pub enum Effect<A> {
    None,
    /// Feed an action back into the queue ahead of any external action.
    Send(A),
    /// Run effects in order; `Send`s keep their relative order.
    Batch(Vec<Effect<A>>),
    /// Async work whose output, if any, is sent back as an action.
    Run {
        cancel_id: Option<CancelId>,
        task: BoxFuture<'static, Option<A>>,
    },
    /// Long-lived subscription; every item is sent back as an action.
    /// Starting a subscription under a cancel id replaces the one running.
    Subscribe {
        cancel_id: CancelId,
        stream: BoxStream<'static, A>,
    },
    Cancel(CancelId),
    /// Ask whoever presented this feature to close it.
    Dismiss,
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Self::None
    }
}

impl<A> fmt::Debug for Effect<A>
where
    A: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Send(action) => f.debug_tuple("Send").field(action).finish(),
            Self::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
            Self::Run { cancel_id, .. } => write!(f, "Run({cancel_id:?})"),
            Self::Subscribe { cancel_id, .. } => write!(f, "Subscribe({cancel_id:?})"),
            Self::Cancel(id) => f.debug_tuple("Cancel").field(id).finish(),
            Self::Dismiss => write!(f, "Dismiss"),
        }
    }
}

impl<A: Send + 'static> Effect<A> {
    pub fn none() -> Self {
        Self::None
    }

    pub fn send(action: A) -> Self {
        Self::Send(action)
    }

    pub fn cancel(id: CancelId) -> Self {
        Self::Cancel(id)
    }

    pub fn batch(effects: Vec<Self>) -> Self {
        let mut effects: Vec<Self> = effects
            .into_iter()
            .filter(|effect| !effect.is_none())
            .collect();
        match effects.len() {
            0 => Self::None,
            1 => effects.pop().unwrap_or(Self::None),
            _ => Self::Batch(effects),
        }
    }

    pub fn run<F>(cancel_id: Option<CancelId>, task: F) -> Self
    where
        F: Future<Output = Option<A>> + Send + 'static,
    {
        Self::Run {
            cancel_id,
            task: task.boxed(),
        }
    }

    pub fn subscribe<S>(cancel_id: CancelId, stream: S) -> Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        Self::Subscribe {
            cancel_id,
            stream: stream.boxed(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Lifts a child effect into the parent's action type.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Clone + Send + Sync + 'static,
    {
        match self {
            Self::None => Effect::None,
            Self::Send(action) => Effect::Send(f(action)),
            Self::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|effect| effect.map(f.clone()))
                    .collect(),
            ),
            Self::Run { cancel_id, task } => Effect::Run {
                cancel_id,
                task: task.map(move |action| action.map(f)).boxed(),
            },
            Self::Subscribe { cancel_id, stream } => Effect::Subscribe {
                cancel_id,
                stream: stream.map(f).boxed(),
            },
            Self::Cancel(id) => Effect::Cancel(id),
            Self::Dismiss => Effect::Dismiss,
        }
    }

    /// Turns every dismissal request into the given parent action.
    pub fn dismiss_into<F>(self, dismiss: F) -> Self
    where
        F: Fn() -> A + Clone,
    {
        match self {
            Self::Dismiss => Self::Send(dismiss()),
            Self::Batch(effects) => Self::Batch(
                effects
                    .into_iter()
                    .map(|effect| effect.dismiss_into(dismiss.clone()))
                    .collect(),
            ),
            other => other,
        }
    }

    /// Drops dismissal requests, for children that are not presented.
    pub fn without_dismiss(self) -> Self {
        match self {
            Self::Dismiss => Self::None,
            Self::Batch(effects) => {
                Self::batch(effects.into_iter().map(Self::without_dismiss).collect())
            }
            other => other,
        }
    }

    /// Actions this effect feeds back synchronously, in order.
    pub fn sent_actions(&self) -> Vec<&A> {
        match self {
            Self::Send(action) => vec![action],
            Self::Batch(effects) => effects.iter().flat_map(Self::sent_actions).collect(),
            _ => Vec::new(),
        }
    }
}
