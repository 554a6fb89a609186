//! Bridge between reducers and the async world: the store runtime that owns
//! feature state and executes effects on tokio tasks.

pub mod runtime;
mod tasks;

pub use runtime::{Store, StoreStopped};
