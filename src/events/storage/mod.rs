//! Durable storage backends for the event sequence.
//!
//! The event log talks to storage exclusively through the
//! [`EventStorage`](interface::EventStorage) trait, so hosts decide where
//! "a durable location" actually is.

pub mod in_memory_storage;
pub mod interface;
pub mod json_file_storage;
