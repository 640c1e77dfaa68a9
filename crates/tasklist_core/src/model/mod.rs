//! Domain model for the to-do list.
//!
//! # Invariants
//! - Every task is identified by an integer `TaskId` unique within its
//!   collection.
//! - Persisted titles are never blank.

pub mod task;
