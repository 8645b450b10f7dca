//! Content generation requests.
//!
//! - [`entities::ContentRequest`] — the persisted record and its state machine
//! - [`entities::ContentStatus`] — `pending → generating → completed | failed`
//! - [`repository::ContentRepository`] — trait for record persistence

pub mod entities;
pub mod repository;
