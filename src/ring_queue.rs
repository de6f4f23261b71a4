//! Fixed-capacity wrap-around ring buffer with freeze/thaw checkpoints.
//!
//! Modeled as a fixed `Vec<T>` indexed by cursors rather than raw pointers,
//! since there is no FFI boundary here to justify manual pointer
//! arithmetic: `start`/`end` become indices into the buffer, and "copy
//! `item_size` bytes" becomes "copy a `T`". Dequeue deliberately does not
//! clear the slot it reads from -- the source never zeroes ring memory
//! either, relying on the next enqueue to overwrite it -- which is what
//! lets `thaw` replay a drained queue without reconstructing it.
//!
//! `T: Copy` keeps dequeue a plain read instead of a destructive move, so a
//! frozen region of the buffer survives being dequeued and can be read
//! again after `thaw`.

use crate::error::QueueError;

pub struct RingQueue<T> {
    data: Vec<Option<T>>,
    capacity: usize,
    start: usize,
    end: usize,
    freeze_start: usize,
    freeze_end: usize,
}

impl<T: Copy> RingQueue<T> {
    /// `capacity` must be `> 1` (mirrors the source's `vox_queue_new`
    /// assertion: a capacity-1 ring cannot distinguish empty from full).
    pub fn new(capacity: usize) -> Result<Self, QueueError> {
        if capacity <= 1 {
            return Err(QueueError::InvalidCapacity { capacity });
        }
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Ok(RingQueue {
            data,
            capacity,
            start: 0,
            end: 0,
            freeze_start: 0,
            freeze_end: 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
    }

    /// Appends `item`. Enqueuing into a queue whose capacity was not
    /// provisioned for the worst case is a programming error, reported as
    /// `QueueError::Full` rather than overwriting unread data.
    pub fn enqueue(&mut self, item: T) -> Result<(), QueueError> {
        let next_end = (self.end + 1) % self.capacity;
        if next_end == self.start {
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }
        self.data[self.end] = Some(item);
        self.end = next_end;
        Ok(())
    }

    /// Reads the head and advances past it, or `None` if empty. The slot
    /// is left populated so a later `thaw` can replay it.
    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.data[self.start];
        self.start = (self.start + 1) % self.capacity;
        item
    }

    /// Snapshots the cursors (not the data) for later restoration.
    pub fn freeze(&mut self) {
        self.freeze_start = self.start;
        self.freeze_end = self.end;
    }

    /// Restores the cursors captured by the last `freeze`.
    pub fn thaw(&mut self) {
        self.start = self.freeze_start;
        self.end = self.freeze_end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_of_one_is_rejected() {
        assert!(matches!(
            RingQueue::<i32>::new(1),
            Err(QueueError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn property_fifo_order() {
        let mut q = RingQueue::new(8).unwrap();
        for i in 0..5 {
            q.enqueue(i).unwrap();
        }
        for i in 0..5 {
            assert_eq!(q.dequeue(), Some(i));
        }
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn property_freeze_thaw_replays_same_sequence() {
        let mut q = RingQueue::new(8).unwrap();
        for i in 0..3 {
            q.enqueue(i).unwrap();
        }
        q.freeze();
        let first_pass: Vec<i32> = std::iter::from_fn(|| q.dequeue()).collect();
        q.thaw();
        let second_pass: Vec<i32> = std::iter::from_fn(|| q.dequeue()).collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn wraps_around_the_buffer_top() {
        let mut q = RingQueue::new(4).unwrap();
        q.enqueue(1).unwrap();
        q.enqueue(2).unwrap();
        assert_eq!(q.dequeue(), Some(1));
        q.enqueue(3).unwrap();
        q.enqueue(4).unwrap();
        assert_eq!(q.dequeue(), Some(2));
        assert_eq!(q.dequeue(), Some(3));
        assert_eq!(q.dequeue(), Some(4));
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn enqueue_into_full_queue_is_error_not_overwrite() {
        let mut q = RingQueue::new(3).unwrap();
        q.enqueue(1).unwrap();
        q.enqueue(2).unwrap();
        assert!(matches!(q.enqueue(3), Err(QueueError::Full { .. })));
    }
}
