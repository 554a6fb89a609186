//! Controller layer: user intents, reducers for each feature, and the effects they return.

pub mod add_talk;
pub mod edit_talk;
pub mod effect;
pub mod events;
pub mod identified;
pub mod orchestration;
pub mod reducer;
pub mod talk_list;

pub use reducer::Reducer;
