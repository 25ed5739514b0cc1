// src/models/mod.rs

//! Domain models for the crawler application.

mod post;
mod thread;

pub use post::PostRecord;
pub use thread::ThreadRecord;
