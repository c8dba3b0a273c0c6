//! Checkable runs of the classic concurrency patterns.
//!
//! Each runner drives a `foundation_sync` primitive from real threads and
//! returns a report that can be checked after the threads have joined:
//! - Concurrent stack push/pop
//! - Producer-consumer over a bounded queue
//! - Phased workers behind a cyclic barrier

pub mod phases;
pub mod producer_consumer;
pub mod stack;

pub use phases::{run_phased_workers, PhaseLog, PhaseViolation};
pub use producer_consumer::{run_producer_consumer, ProducerConsumerReport};
pub use stack::{run_push_pop, PushPopReport};
