//! Age-aware priority queue over generation-checked slots
//!
//! Entries live in a [`SlotMap`]; a separate front-to-back sequence of slot
//! ids holds the current priority order. Ordering is only refreshed by
//! [`AgePriorityQueue::update`] / [`AgePriorityQueue::partial_update`], which
//! the scheduler calls once per tick, so pushes stay O(1).

use std::cmp::Ordering;

use crate::foundation::collections::{SlotId, SlotMap};

#[derive(Debug)]
struct Entry<T> {
    value: T,
    age: f32,
    priority: f32,
    sequence: u64,
}

/// Default ordering: strictly descending priority
pub fn by_descending_priority(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

/// Priority queue whose entries gain priority as they wait
#[derive(Debug)]
pub struct AgePriorityQueue<T> {
    entries: SlotMap<SlotId, Entry<T>>,
    order: Vec<SlotId>,
    next_sequence: u64,
}

impl<T> AgePriorityQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Create an empty queue sized for `capacity` live entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: SlotMap::with_capacity_and_key(capacity),
            order: Vec::with_capacity(capacity),
            next_sequence: 0,
        }
    }

    /// Append a value at the back of the current order
    ///
    /// The entry starts with age and priority zero until the next update.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let id = self.entries.insert(Entry {
            value,
            age: 0.0,
            priority: 0.0,
            sequence,
        });
        self.order.push(id);
        id
    }

    /// Remove an entry by id
    ///
    /// Linear in the queue length. Stale or unknown ids return `None` in
    /// release builds and assert in debug builds; use [`AgePriorityQueue::has`]
    /// first when the id may be dead.
    pub fn erase(&mut self, id: SlotId) -> Option<T> {
        let position = self.order.iter().position(|&queued| queued == id);
        debug_assert!(position.is_some(), "erase of stale or absent slot id {id:?}");
        let position = position?;

        self.order.remove(position);
        let entry = self.entries.remove(id);
        debug_assert!(entry.is_some(), "queue order referenced a dead slot");
        entry.map(|entry| entry.value)
    }

    /// Remove and return the entry at the front of the current order
    pub fn pop_front(&mut self) -> Option<(SlotId, T)> {
        if self.order.is_empty() {
            return None;
        }

        let id = self.order.remove(0);
        let entry = self.entries.remove(id)?;
        Some((id, entry.value))
    }

    /// Remove up to `count` entries from the front, in order
    pub fn drain_front(&mut self, count: usize) -> Vec<(SlotId, T)> {
        let count = count.min(self.order.len());
        let ids: Vec<SlotId> = self.order.drain(..count).collect();
        ids.into_iter()
            .filter_map(|id| self.entries.remove(id).map(|entry| (id, entry.value)))
            .collect()
    }

    /// Check whether `id` refers to a live entry
    pub fn has(&self, id: SlotId) -> bool {
        self.entries.contains_key(id)
    }

    /// Get a value by id
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.entries.get(id).map(|entry| &entry.value)
    }

    /// Get a mutable value by id
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entries.get_mut(id).map(|entry| &mut entry.value)
    }

    /// Accumulated age of an entry, in the units passed to `update`
    pub fn age(&self, id: SlotId) -> Option<f32> {
        self.entries.get(id).map(|entry| entry.age)
    }

    /// Priority computed for an entry by the last update
    pub fn priority(&self, id: SlotId) -> Option<f32> {
        self.entries.get(id).map(|entry| entry.priority)
    }

    /// Id at the front of the current order
    pub fn front_id(&self) -> Option<SlotId> {
        self.order.first().copied()
    }

    /// Id at the back of the current order
    pub fn back_id(&self) -> Option<SlotId> {
        self.order.last().copied()
    }

    /// Value at the front of the current order
    pub fn front(&self) -> Option<&T> {
        self.front_id().and_then(|id| self.get(id))
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    /// Iterate over `(id, value)` in the current order
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.order
            .iter()
            .filter_map(|&id| self.entries.get(id).map(|entry| (id, &entry.value)))
    }

    /// Age every entry, recompute priorities, and fully re-sort
    ///
    /// `update_fn(age, value)` returns the new priority; `compare_fn` orders
    /// two priorities. Equal priorities keep insertion order.
    pub fn update<U, C>(&mut self, aging: f32, update_fn: U, compare_fn: C)
    where
        U: FnMut(f32, &T) -> f32,
        C: Fn(f32, f32) -> Ordering,
    {
        self.reprioritize(aging, update_fn);

        let entries = &self.entries;
        self.order.sort_by(|a, b| Self::compare_ranks(entries, &compare_fn, *a, *b));
    }

    /// [`AgePriorityQueue::update`] with the default descending order
    pub fn update_by_priority<U>(&mut self, aging: f32, update_fn: U)
    where
        U: FnMut(f32, &T) -> f32,
    {
        self.update(aging, update_fn, by_descending_priority);
    }

    /// Age every entry and recompute priorities, but only guarantee the
    /// first `count` positions are in order
    ///
    /// Ties fall back to insertion order so the first `count` entries match
    /// what a full stable sort would produce.
    pub fn partial_update<U, C>(&mut self, count: usize, aging: f32, update_fn: U, compare_fn: C)
    where
        U: FnMut(f32, &T) -> f32,
        C: Fn(f32, f32) -> Ordering,
    {
        self.reprioritize(aging, update_fn);

        if count == 0 || self.order.is_empty() {
            return;
        }

        let entries = &self.entries;
        let compare = |a: &SlotId, b: &SlotId| Self::compare_ranks(entries, &compare_fn, *a, *b);

        if count < self.order.len() {
            self.order.select_nth_unstable_by(count - 1, compare);
            self.order[..count].sort_unstable_by(compare);
        } else {
            self.order.sort_unstable_by(compare);
        }
    }

    fn reprioritize<U>(&mut self, aging: f32, mut update_fn: U)
    where
        U: FnMut(f32, &T) -> f32,
    {
        for entry in self.entries.values_mut() {
            entry.age += aging;
            entry.priority = update_fn(entry.age, &entry.value);
        }
    }

    // Equal priorities fall back to insertion order, so a tail left unordered
    // by a partial update cannot reorder ties on the next full update.
    fn compare_ranks<C>(entries: &SlotMap<SlotId, Entry<T>>, compare_fn: &C, a: SlotId, b: SlotId) -> Ordering
    where
        C: Fn(f32, f32) -> Ordering,
    {
        let (ea, eb) = (entries.get(a), entries.get(b));
        let priority_a = ea.map_or(f32::MIN, |entry| entry.priority);
        let priority_b = eb.map_or(f32::MIN, |entry| entry.priority);
        compare_fn(priority_a, priority_b).then_with(|| {
            let sequence_a = ea.map_or(u64::MAX, |entry| entry.sequence);
            let sequence_b = eb.map_or(u64::MAX, |entry| entry.sequence);
            sequence_a.cmp(&sequence_b)
        })
    }
}

impl<T> Default for AgePriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
