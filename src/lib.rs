// Library surface for the binary, headless sessions and integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod definition;
pub mod drill;
pub mod error;
pub mod keymap;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod typing_policy;
pub mod ui;
pub mod word_store;

pub use error::SpellError;
