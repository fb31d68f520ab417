//! Priority structure over price levels
//!
//! A binary min-heap of levels keyed by [`Level::key`], so the most
//! aggressive price sits at the root for either side. Levels live in a
//! slab arena owned by the ladder; the heap stores arena keys and writes
//! its position back into each level (`heap_slot`) on every move, which
//! makes removal by position O(log n) with an O(1) slot lookup.
//!
//! A heap does not iterate in sorted order by itself. [`LevelHeap::walk`]
//! traverses it with an auxiliary min-ordered frontier of pending heap
//! positions: visit the root, then push a node's children as candidates
//! whenever the node is emitted. Producing the first N levels costs
//! O(N log N) without disturbing the heap.

use super::level::Level;
use rust_decimal::Decimal;
use slab::Slab;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Default)]
pub(crate) struct LevelHeap {
    /// Arena keys in heap order
    slots: Vec<usize>,
}

impl LevelHeap {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Arena key of the most aggressive level
    pub fn peek(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Insert a level by its arena key
    pub fn push(&mut self, arena: &mut Slab<Level>, key: usize) {
        let position = self.slots.len();
        self.slots.push(key);
        arena[key].heap_slot = position;
        self.sift_up(arena, position);
    }

    /// Remove the level at the given heap position, returning its arena
    /// key. Returns None if the position is out of bounds.
    pub fn remove(&mut self, arena: &mut Slab<Level>, position: usize) -> Option<usize> {
        if position >= self.slots.len() {
            return None;
        }

        let last = self.slots.len() - 1;
        self.swap(arena, position, last);
        let key = self.slots.pop()?;
        arena[key].heap_slot = usize::MAX;

        if position < self.slots.len() {
            self.sift_down(arena, position);
            self.sift_up(arena, position);
        }

        Some(key)
    }

    /// Visit levels in priority order until `f` returns false
    pub fn walk<F>(&self, arena: &Slab<Level>, mut f: F)
    where
        F: FnMut(&Level) -> bool,
    {
        let mut frontier: BinaryHeap<Reverse<(Decimal, usize)>> =
            BinaryHeap::with_capacity(self.slots.len() / 2 + 1);

        let enqueue = |frontier: &mut BinaryHeap<Reverse<(Decimal, usize)>>, position: usize| {
            if let Some(&key) = self.slots.get(position) {
                frontier.push(Reverse((arena[key].key(), position)));
            }
        };

        enqueue(&mut frontier, 0);

        while let Some(Reverse((_, position))) = frontier.pop() {
            enqueue(&mut frontier, 2 * position + 1);
            enqueue(&mut frontier, 2 * position + 2);

            if !f(&arena[self.slots[position]]) {
                break;
            }
        }
    }

    fn less(&self, arena: &Slab<Level>, a: usize, b: usize) -> bool {
        arena[self.slots[a]].key() < arena[self.slots[b]].key()
    }

    fn swap(&mut self, arena: &mut Slab<Level>, a: usize, b: usize) {
        self.slots.swap(a, b);
        arena[self.slots[a]].heap_slot = a;
        arena[self.slots[b]].heap_slot = b;
    }

    fn sift_up(&mut self, arena: &mut Slab<Level>, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(arena, position, parent) {
                break;
            }
            self.swap(arena, position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, arena: &mut Slab<Level>, mut position: usize) {
        loop {
            let left = 2 * position + 1;
            let right = 2 * position + 2;
            let mut smallest = position;

            if left < self.slots.len() && self.less(arena, left, smallest) {
                smallest = left;
            }
            if right < self.slots.len() && self.less(arena, right, smallest) {
                smallest = right;
            }
            if smallest == position {
                break;
            }

            self.swap(arena, position, smallest);
            position = smallest;
        }
    }

    #[cfg(test)]
    pub fn slot_at(&self, position: usize) -> Option<usize> {
        self.slots.get(position).copied()
    }
}
