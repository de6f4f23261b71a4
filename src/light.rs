//! Double-buffered BFS work-queue pair for light propagation.

use crate::chunk::CHUNK_CELLS;
use crate::ring_queue::RingQueue;

/// A BFS work record: "at world cell `(x,y,z)`, consider propagating light
/// level `lv`". Coordinates are world cell space, not chunk-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightItem {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub lv: u8,
}

/// Conservative worst-case BFS frontier size: `CHUNK_CELLS * 9 * 2`, wide
/// enough that a full chunk re-light can never overflow the ring.
pub fn light_queue_capacity() -> usize {
    CHUNK_CELLS * 9 * 2
}

pub struct LightSubstrate {
    queue_1: RingQueue<LightItem>,
    queue_2: RingQueue<LightItem>,
    active_is_one: bool,
}

impl LightSubstrate {
    pub fn new() -> Self {
        let cap = light_queue_capacity();
        LightSubstrate {
            queue_1: RingQueue::new(cap).expect("light queue capacity must be > 1"),
            queue_2: RingQueue::new(cap).expect("light queue capacity must be > 1"),
            active_is_one: true,
        }
    }

    fn active(&mut self) -> &mut RingQueue<LightItem> {
        if self.active_is_one {
            &mut self.queue_1
        } else {
            &mut self.queue_2
        }
    }

    /// Points the active queue at queue #1 and clears both.
    pub fn upd_start(&mut self) {
        self.active_is_one = true;
        self.queue_1.clear();
        self.queue_2.clear();
    }

    /// Switches the active pointer: `0` selects queue #1, any other value
    /// selects queue #2.
    pub fn select_queue(&mut self, which: u32) {
        self.active_is_one = which == 0;
    }

    pub fn enqueue(&mut self, x: i32, y: i32, z: i32, lv: u8) {
        self.active()
            .enqueue(LightItem { x, y, z, lv })
            .expect("light queue sized for worst-case BFS frontier");
    }

    /// Appends the six axis-aligned neighbors, deterministic order
    /// `+x, -x, +y, -y, +z, -z`, all at the same level.
    pub fn enqueue_neighbours(&mut self, x: i32, y: i32, z: i32, lv: u8) {
        self.enqueue(x + 1, y, z, lv);
        self.enqueue(x - 1, y, z, lv);
        self.enqueue(x, y + 1, z, lv);
        self.enqueue(x, y - 1, z, lv);
        self.enqueue(x, y, z + 1, lv);
        self.enqueue(x, y, z - 1, lv);
    }

    pub fn freeze_queue(&mut self) {
        self.active().freeze();
    }

    pub fn thaw_queue(&mut self) {
        self.active().thaw();
    }

    pub fn dequeue(&mut self) -> Option<LightItem> {
        self.active().dequeue()
    }
}

impl Default for LightSubstrate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s4_light_double_buffering() {
        let mut light = LightSubstrate::new();
        light.upd_start();

        light.enqueue(1, 2, 3, 10);
        light.enqueue(4, 5, 6, 7);

        light.select_queue(1);
        light.enqueue(0, 0, 0, 15);

        light.select_queue(0);
        let first = light.dequeue().unwrap();
        let second = light.dequeue().unwrap();
        assert_eq!(first, LightItem { x: 1, y: 2, z: 3, lv: 10 });
        assert_eq!(second, LightItem { x: 4, y: 5, z: 6, lv: 7 });
        assert_eq!(light.dequeue(), None);

        light.select_queue(1);
        assert_eq!(light.dequeue(), Some(LightItem { x: 0, y: 0, z: 0, lv: 15 }));
    }

    #[test]
    fn enqueue_neighbours_uses_deterministic_order() {
        let mut light = LightSubstrate::new();
        light.upd_start();
        light.enqueue_neighbours(10, 10, 10, 5);

        let expected = [
            (11, 10, 10),
            (9, 10, 10),
            (10, 11, 10),
            (10, 9, 10),
            (10, 10, 11),
            (10, 10, 9),
        ];
        for (x, y, z) in expected {
            let item = light.dequeue().unwrap();
            assert_eq!((item.x, item.y, item.z), (x, y, z));
            assert_eq!(item.lv, 5);
        }
    }
}
