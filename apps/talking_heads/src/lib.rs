//! Talk proposal tracker: reducers for the list, add and edit features, the
//! store runtime that executes their effects, and a terminal front-end.

pub mod backend_bridge;
pub mod config;
pub mod controller;
pub mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
