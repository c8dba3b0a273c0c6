//! Producers and consumers handing values through a `BoundedQueue`.

use foundation_sync::BoundedQueue;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

/// Outcome of [`run_producer_consumer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConsumerReport {
    /// Number of producer (and consumer) threads.
    pub producers: usize,
    /// Values each producer enqueued, `0..items_per_producer`.
    pub items_per_producer: usize,
    /// Every dequeued `(producer, value)` pair, grouped by consumer.
    pub consumed: Vec<Vec<(usize, usize)>>,
    /// Items left in the queue after every thread joined.
    pub final_len: usize,
}

impl ProducerConsumerReport {
    /// Total values enqueued.
    #[must_use]
    pub const fn enqueued(&self) -> usize {
        self.producers * self.items_per_producer
    }

    /// Total values dequeued across all consumers.
    #[must_use]
    pub fn dequeued(&self) -> usize {
        self.consumed.iter().map(Vec::len).sum()
    }

    /// Every produced value was consumed exactly once and the queue drained.
    #[must_use]
    pub fn is_lossless(&self) -> bool {
        let mut seen: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for item in self.consumed.iter().flatten() {
            *seen.entry(*item).or_default() += 1;
        }

        self.final_len == 0
            && seen.len() == self.enqueued()
            && seen.values().all(|count| *count == 1)
            && seen.keys().all(|(producer, value)| {
                *producer < self.producers && *value < self.items_per_producer
            })
    }

    /// Each consumer saw any single producer's values in increasing order.
    #[must_use]
    pub fn is_fifo_per_producer(&self) -> bool {
        self.consumed.iter().all(|items| {
            let mut last: BTreeMap<usize, usize> = BTreeMap::new();
            items.iter().all(|(producer, value)| {
                let in_order = last.get(producer).is_none_or(|previous| previous < value);
                last.insert(*producer, *value);
                in_order
            })
        })
    }
}

/// Runs `producers` producer threads and as many consumer threads over a
/// queue of the given `capacity`.
///
/// Each producer enqueues `(producer, value)` for `value` in
/// `0..items_per_producer`. Each consumer dequeues until it receives a value
/// equal to `items_per_producer - 1`, then stops. Since the queue is FIFO a
/// producer's last value is dequeued after all of its earlier ones, so once
/// every consumer has stopped the queue is empty.
///
/// # Examples
///
/// ```
/// use foundation_testing::scenarios::run_producer_consumer;
///
/// let report = run_producer_consumer(10, 2, 5);
///
/// assert_eq!(report.enqueued(), 10);
/// assert_eq!(report.dequeued(), 10);
/// assert!(report.is_lossless());
/// ```
///
/// # Panics
///
/// Panics if `capacity` or `items_per_producer` is 0, or if a worker thread
/// panics.
#[must_use]
pub fn run_producer_consumer(
    capacity: usize,
    producers: usize,
    items_per_producer: usize,
) -> ProducerConsumerReport {
    assert!(items_per_producer > 0, "items per producer must be > 0");
    let last_value = items_per_producer - 1;
    let queue = Arc::new(BoundedQueue::new(capacity));

    let producer_handles: Vec<_> = (0..producers)
        .map(|producer| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for value in 0..items_per_producer {
                    queue.enqueue((producer, value));
                }
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..producers)
        .map(|_| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let mut consumed = Vec::new();
                loop {
                    let item: (usize, usize) = queue.dequeue();
                    consumed.push(item);
                    if item.1 == last_value {
                        return consumed;
                    }
                }
            })
        })
        .collect();

    for handle in producer_handles {
        handle.join().expect("producer panicked");
    }

    let consumed = consumer_handles
        .into_iter()
        .map(|handle| handle.join().expect("consumer panicked"))
        .collect();

    let report = ProducerConsumerReport {
        producers,
        items_per_producer,
        consumed,
        final_len: queue.len(),
    };
    tracing::debug!(
        enqueued = report.enqueued(),
        dequeued = report.dequeued(),
        "producer/consumer scenario finished"
    );
    report
}
