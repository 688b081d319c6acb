//! Intersection Synchronization Library
//!
//! Decides which vehicles may cross a four-way intersection at the same time,
//! with a threaded simulation driver for exercising it.

pub mod simulation;
pub mod synch;
