//! `ConcurrentStack` stress run.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_sync::ConcurrentStack;
use std::sync::Arc;

/// Hammers a shared stack with pushes and pops.
///
/// Even threads push, odd threads pop. A pop that finds the stack empty is
/// still a success: failing fast on empty is the contract. Only a popped value
/// that was never pushed counts as a failure.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_stack_stress};
///
/// let config = StressConfig::new().threads(4).iterations(500);
/// let result = run_stack_stress(config);
///
/// assert_eq!(result.failures, 0);
/// ```
#[must_use]
pub fn run_stack_stress(config: StressConfig) -> StressResult {
    let stack = Arc::new(ConcurrentStack::new());
    let iterations = config.get_iterations();

    StressHarness::new(config).run(move |thread_id, iteration| {
        if thread_id % 2 == 0 {
            stack.push((thread_id, iteration));
            return true;
        }

        match stack.pop() {
            Ok((pushed_by, value)) => pushed_by % 2 == 0 && value < iterations,
            Err(err) => err.is_empty(),
        }
    })
}
