// core logic - page model, endpoint client, and the form handler

pub mod cards;
mod client;
mod diagnostics;
mod handler;
pub mod markup;
mod page;
mod query;

pub use client::{Client, DEFAULT_ENDPOINT};
pub use diagnostics::{Diagnostics, LogEntry, LogLevel};
pub use handler::{FormHandler, LOADING_CLASS, SubmitEvent};
pub use page::{Document, Element};
pub use query::{Query, Reply};
