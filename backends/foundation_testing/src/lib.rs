//! Reusable stress testing infrastructure for the `foundation_sync` primitives.
//!
//! This crate provides:
//! - **Stress test framework**: Configurable high-contention testing
//! - **Primitive stress runs**: Stack, bounded queue, barrier and semaphore workloads
//! - **Scenarios**: Checkable runs of the classic patterns (concurrent stack
//!   push/pop, producer-consumer, phased workers)
//!
//! # Examples
//!
//! ```rust
//! use foundation_testing::stress::{StressConfig, StressHarness};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let config = StressConfig::new()
//!     .threads(10)
//!     .iterations(1000);
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! let harness = StressHarness::new(config);
//!
//! let counter_clone = Arc::clone(&counter);
//! let results = harness.run(move |_thread_id, _iteration| {
//!     counter_clone.fetch_add(1, Ordering::Relaxed);
//!     true
//! });
//!
//! assert_eq!(results.successes, 10000); // 10 threads * 1000 iterations
//! assert!(results.success_rate() > 0.99);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // Common for testing crates

pub mod scenarios;
pub mod stress;

// Re-export commonly used items
pub use scenarios::{PhaseLog, PhaseViolation, ProducerConsumerReport, PushPopReport};
pub use stress::{StressConfig, StressHarness, StressResult};
