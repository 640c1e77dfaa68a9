//! Task use-cases.
//!
//! # Responsibility
//! - `task_ops`: pure collection transforms.
//! - `task_store`: the shared store screens mutate through.
//! - `seed`: first-launch defaults.

pub mod seed;
pub mod task_ops;
pub mod task_store;
