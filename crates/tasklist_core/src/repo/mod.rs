//! Repository layer: key-value persistence and the task Storage Adapter.
//!
//! # Responsibility
//! - Define the string key-value contract the app persists through.
//! - Isolate SQLite query details from service orchestration.
//! - Own the (de)serialization of the single task blob.
//!
//! # Invariants
//! - The task collection lives under exactly one key and is always written
//!   as a whole.
//! - The storage key is never deleted.

pub mod kv_repo;
pub mod storage_adapter;
