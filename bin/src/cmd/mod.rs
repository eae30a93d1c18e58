//! Command implementations for the CLI.

pub(crate) mod config;
pub(crate) mod factors;
pub(crate) mod inspect;
pub(crate) mod screen;
