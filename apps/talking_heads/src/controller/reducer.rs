//! The reducer contract shared by every feature.

use crate::controller::effect::Effect;

/// A feature: mutates its state in response to an action and describes the
/// follow-up work as an [`Effect`]. Reducers never perform I/O themselves.
pub trait Reducer: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;
    type Action: Send + 'static;

    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> Effect<Self::Action>;
}
