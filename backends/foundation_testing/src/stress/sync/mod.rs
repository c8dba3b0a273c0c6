//! Stress runs for each `foundation_sync` primitive.

pub mod barrier;
pub mod queue;
pub mod semaphore;
pub mod stack;

pub use barrier::run_barrier_stress;
pub use queue::run_queue_stress;
pub use semaphore::run_semaphore_stress;
pub use stack::run_stack_stress;
