//! Fixed-capacity FIFO channel where both ends block.

use std::collections::VecDeque;
use std::fmt;

use crate::monitor::Monitor;

/// A bounded, blocking FIFO queue.
///
/// [`BoundedQueue::enqueue`] blocks while the queue holds `capacity` items and
/// [`BoundedQueue::dequeue`] blocks while it is empty, giving producers
/// back-pressure. Producers and consumers share one condition variable and
/// every state change wakes all waiters, each of which re-checks its own
/// predicate.
///
/// There is no close or shutdown operation and no call ever fails. A consumer
/// blocked on an empty queue is only released by a later `enqueue`. Shutting
/// down is the caller's job, typically by sending one in-band sentinel per
/// consumer (for example `None` in a `BoundedQueue<Option<T>>`).
///
/// # Examples
///
/// ```
/// use foundation_sync::BoundedQueue;
/// use std::sync::Arc;
/// use std::thread;
///
/// let queue: Arc<BoundedQueue<Option<u32>>> = Arc::new(BoundedQueue::new(4));
///
/// let consumer = {
///     let queue = Arc::clone(&queue);
///     thread::spawn(move || {
///         let mut total = 0;
///         while let Some(value) = queue.dequeue() {
///             total += value;
///         }
///         total
///     })
/// };
///
/// for value in 1..=10 {
///     queue.enqueue(Some(value));
/// }
/// queue.enqueue(None);
///
/// assert_eq!(consumer.join().unwrap(), 55);
/// ```
pub struct BoundedQueue<T> {
    items: Monitor<VecDeque<T>>,
    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue holding at most `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be > 0");
        Self {
            items: Monitor::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends `value` at the tail, blocking while the queue is full.
    pub fn enqueue(&self, value: T) {
        let capacity = self.capacity;
        let mut items = self.items.lock();
        if items.len() >= capacity {
            debug!(capacity, "BoundedQueue: producer blocked on a full queue");
            items = self.items.wait_while(items, |items| items.len() >= capacity);
        }

        items.push_back(value);
        drop(items);

        self.items.notify_all();
    }

    /// Removes and returns the head, blocking while the queue is empty.
    pub fn dequeue(&self) -> T {
        let mut items = self.items.lock();
        if items.is_empty() {
            trace!("BoundedQueue: consumer waiting on an empty queue");
            items = self.items.wait_while(items, |items| items.is_empty());
        }

        let value = items
            .pop_front()
            .expect("queue is non-empty once wait_while returns");
        drop(items);

        self.items.notify_all();
        value
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.with(|items| items.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.with(|items| items.is_empty())
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.items.with(|items| items.len() >= self.capacity)
    }
}

impl<T> fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;
    use serial_test::serial;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    /// WHY: Validates queue panics on zero capacity
    /// WHAT: Creating a queue with capacity 0 should panic
    #[test]
    #[should_panic(expected = "queue capacity must be > 0")]
    fn test_new_zero_panics() {
        let _ = BoundedQueue::<u8>::new(0);
    }

    /// WHY: Validates FIFO order and the size snapshots
    /// WHAT: Items come out in the order they went in
    #[test]
    #[timeout(1000)]
    fn test_fifo_single_thread() {
        let queue = BoundedQueue::new(3);
        assert!(queue.is_empty());

        queue.enqueue('a');
        queue.enqueue('b');
        queue.enqueue('c');
        assert!(queue.is_full());
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.capacity(), 3);

        assert_eq!(queue.dequeue(), 'a');
        assert_eq!(queue.dequeue(), 'b');
        assert_eq!(queue.dequeue(), 'c');
        assert!(queue.is_empty());
    }

    /// WHY: A full queue must hold producers back until a slot frees up
    /// WHAT: The second enqueue on a capacity-1 queue completes only after a dequeue
    #[test]
    #[serial]
    #[timeout(10000)]
    fn test_enqueue_blocks_when_full() {
        let queue = Arc::new(BoundedQueue::new(1));
        let second_done = Arc::new(AtomicBool::new(false));
        queue.enqueue(1);

        let producer = {
            let queue = Arc::clone(&queue);
            let second_done = Arc::clone(&second_done);
            thread::spawn(move || {
                queue.enqueue(2);
                second_done.store(true, Ordering::Release);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!second_done.load(Ordering::Acquire));
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.dequeue(), 1);
        producer.join().unwrap();

        assert!(second_done.load(Ordering::Acquire));
        assert_eq!(queue.dequeue(), 2);
    }

    /// WHY: An empty queue must hold consumers back until data arrives
    /// WHAT: dequeue on an empty queue returns the value enqueued later
    #[test]
    #[serial]
    #[timeout(10000)]
    fn test_dequeue_blocks_when_empty() {
        let queue = Arc::new(BoundedQueue::new(2));

        let consumer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.dequeue())
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!consumer.is_finished());

        queue.enqueue(String::from("late"));
        assert_eq!(consumer.join().unwrap(), "late");
    }

    /// WHY: Every parked consumer re-checks emptiness after a broadcast wake
    /// WHAT: Three consumers blocked on an empty queue each take exactly one of three late values
    #[test]
    #[serial]
    #[timeout(10000)]
    fn test_parked_consumers_each_take_one_value() {
        let queue = Arc::new(BoundedQueue::new(1));

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.dequeue())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        assert!(consumers.iter().all(|consumer| !consumer.is_finished()));

        for value in [10, 20, 30] {
            queue.enqueue(value);
        }

        let mut received: Vec<i32> = consumers
            .into_iter()
            .map(|consumer| consumer.join().unwrap())
            .collect();
        received.sort_unstable();

        assert_eq!(received, vec![10, 20, 30]);
        assert!(queue.is_empty());
    }

    /// WHY: With one producer and one consumer order must be preserved under back-pressure
    /// WHAT: 1000 items through a capacity-4 queue arrive in order
    #[test]
    #[timeout(30000)]
    fn test_fifo_single_producer_single_consumer() {
        let queue = Arc::new(BoundedQueue::new(4));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for value in 0..1000 {
                    queue.enqueue(value);
                    assert!(queue.len() <= 4);
                }
            })
        };

        let received: Vec<i32> = (0..1000).map(|_| queue.dequeue()).collect();
        producer.join().unwrap();

        assert_eq!(received, (0..1000).collect::<Vec<_>>());
        assert!(queue.is_empty());
    }

    /// WHY: Validates Debug implementation
    /// WHAT: Debug formatting reports length and capacity
    #[test]
    fn test_debug() {
        let queue = BoundedQueue::new(8);
        queue.enqueue(1);
        let debug = format!("{queue:?}");
        assert!(debug.contains("len: 1"));
        assert!(debug.contains("capacity: 8"));
    }
}
