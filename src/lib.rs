// ankiform library - question form client

pub mod cli;
mod core;
mod error;
pub mod tui;

pub use crate::core::{
    Client, DEFAULT_ENDPOINT, Diagnostics, Document, Element, FormHandler, LOADING_CLASS,
    LogEntry, LogLevel, Query, Reply, SubmitEvent, cards, markup,
};
pub use error::Error;
