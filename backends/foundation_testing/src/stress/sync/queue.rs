//! `BoundedQueue` stress run.

use crate::stress::{StressConfig, StressHarness, StressResult};
use foundation_sync::BoundedQueue;
use std::sync::Arc;

/// Runs producer/consumer pairs through a small bounded queue.
///
/// Even threads enqueue one value per iteration and odd threads dequeue one.
/// With an odd thread count the last thread only observes the queue and
/// fails if it ever sees more than `capacity` items buffered.
///
/// Every producer needs its consumer to make progress, so any duration in
/// `config` is ignored and all iterations run to completion.
///
/// # Examples
///
/// ```
/// use foundation_testing::stress::{StressConfig, sync::run_queue_stress};
///
/// let config = StressConfig::new().threads(4).iterations(500);
/// let result = run_queue_stress(config, 8);
///
/// assert_eq!(result.failures, 0);
/// ```
///
/// # Panics
///
/// Panics if `capacity` is 0.
#[must_use]
pub fn run_queue_stress(config: StressConfig, capacity: usize) -> StressResult {
    let config = config.without_duration();
    let queue = Arc::new(BoundedQueue::new(capacity));
    let iterations = config.get_iterations();
    let observer = (config.get_thread_count() % 2 == 1).then(|| config.get_thread_count() - 1);

    StressHarness::new(config).run(move |thread_id, iteration| {
        if Some(thread_id) == observer {
            return queue.len() <= queue.capacity();
        }

        if thread_id % 2 == 0 {
            queue.enqueue(iteration);
            true
        } else {
            queue.dequeue() < iterations
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;

    #[test]
    #[timeout(30000)]
    fn test_queue_stress_pairs() {
        let result = run_queue_stress(StressConfig::new().threads(4).iterations(1000), 4);

        assert_eq!(result.total_operations(), 4000);
        assert_eq!(result.failures, 0);
    }

    #[test]
    #[timeout(30000)]
    fn test_queue_stress_with_observer() {
        let result = run_queue_stress(StressConfig::new().threads(5).iterations(500), 2);

        assert_eq!(result.total_operations(), 2500);
        assert_eq!(result.failures, 0);
    }

    #[test]
    #[timeout(30000)]
    fn test_queue_stress_ignores_duration() {
        let config = StressConfig::new()
            .threads(2)
            .iterations(300)
            .duration_secs(0);

        let result = run_queue_stress(config, 1);
        assert_eq!(result.successes, 600);
    }
}
