//! Blocking synchronization primitives built on the monitor pattern.
//!
//! Every type in this crate owns exactly one [`std::sync::Mutex`] guarding all
//! of its mutable state and, where it needs to block, one
//! [`std::sync::Condvar`]. Waiting is always done against an explicit predicate
//! which is re-checked after every wake-up, so spurious wake-ups are harmless.
//!
//! This crate provides:
//! - [`Monitor`]: a mutex and condition variable pair with predicate waits
//! - [`ConcurrentStack`]: a LIFO container whose `pop` fails fast when empty
//! - [`BoundedQueue`]: a fixed-capacity FIFO channel where both ends block
//! - [`CyclicBarrier`]: a reusable rendezvous for a fixed number of threads
//! - [`CountingSemaphore`]: a bounded pool of permits
//!
//! None of the blocking calls support timeouts or cancellation.
//!
//! # Examples
//!
//! ```rust
//! use foundation_sync::{BoundedQueue, CyclicBarrier};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let queue = Arc::new(BoundedQueue::new(2));
//! let barrier = Arc::new(CyclicBarrier::new(2));
//!
//! let producer = {
//!     let queue = Arc::clone(&queue);
//!     let barrier = Arc::clone(&barrier);
//!     thread::spawn(move || {
//!         for i in 0..4 {
//!             queue.enqueue(i);
//!         }
//!         barrier.arrive_and_wait();
//!     })
//! };
//!
//! let received: Vec<i32> = (0..4).map(|_| queue.dequeue()).collect();
//! barrier.arrive_and_wait();
//! producer.join().unwrap();
//!
//! assert_eq!(received, vec![0, 1, 2, 3]);
//! ```
//!
//! # Features
//!
//! - `log_debug`: emit `tracing` debug events (barrier releases, blocked producers)
//! - `log_trace`: emit `tracing` trace events for every suspension
//! - `debug_trace`: both of the above

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod logs;

pub mod barrier;
pub mod errors;
pub mod monitor;
pub mod queue;
pub mod semaphore;
pub mod stack;

pub use barrier::{BarrierWaitResult, CyclicBarrier};
pub use errors::{SemaphoreError, SemaphoreResult, StackError, StackResult};
pub use monitor::{Monitor, MonitorGuard};
pub use queue::BoundedQueue;
pub use semaphore::{CountingSemaphore, SemaphorePermit};
pub use stack::ConcurrentStack;
