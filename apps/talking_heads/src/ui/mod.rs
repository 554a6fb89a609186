//! Terminal front-end: renders list state as text and parses typed commands.

pub mod input;
pub mod render;

pub use input::{parse_command, InputError, HELP};
pub use render::render;
