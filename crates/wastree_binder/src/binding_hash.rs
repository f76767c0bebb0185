//! The binding hash: an open-addressing name-to-index table.
//!
//! Collisions are resolved with coalesced chaining inside the entry array
//! (Brent-style). Each slot is either occupied or on a doubly-linked free
//! list threaded through the same `next`/`prev` links. An entry sitting in
//! its own natural slot heads that slot's chain. When a new name's natural
//! slot is held by an entry displaced from some other chain, that entry is
//! moved to a free slot so the new name can claim its natural slot; this
//! keeps every chain reachable from its natural slot regardless of
//! insertion order.
//!
//! Names are stored as [`NameRef`] views. Dropping the table frees the
//! entry vector only.

use crate::var::Var;
use wastree_core::error::AllocError;
use wastree_core::name::NameRef;

/// Slot count allocated by the first insertion.
pub const INITIAL_CAPACITY: usize = 8;

/// A (name, index) pair recording where a declared symbol lives.
#[derive(Debug, Clone, Copy)]
pub struct Binding<'a> {
    name: NameRef<'a>,
    /// Position of the symbol in its scope's backing sequence.
    pub index: u32,
}

impl<'a> Binding<'a> {
    const FREE: Binding<'static> = Binding {
        name: NameRef::NULL,
        index: 0,
    };

    #[inline]
    pub fn name(&self) -> NameRef<'a> {
        self.name
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    binding: Binding<'a>,
    /// Next slot in this entry's collision chain, or in the free list.
    next: Option<u32>,
    /// Previous slot in the free list. Unused once occupied.
    prev: Option<u32>,
}

impl Entry<'_> {
    #[inline]
    fn is_free(&self) -> bool {
        self.binding.name.is_null()
    }
}

/// Open-addressing hash table from names to indices.
///
/// Capacity is zero until the first insertion, then 8, doubling whenever an
/// insertion finds no free slot.
#[derive(Debug, Default)]
pub struct BindingHash<'a> {
    entries: Vec<Entry<'a>>,
    size: usize,
    free_head: Option<u32>,
}

impl<'a> BindingHash<'a> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            size: 0,
            free_head: None,
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Total slot count; zero for a table that was never inserted into.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Occupied bindings in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Binding<'a>> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_free())
            .map(|entry| &entry.binding)
    }

    /// Bind `name`, returning the new binding with `index` set to 0 for the
    /// caller to fill in.
    ///
    /// The stored name is the caller's view; whatever owns its bytes must
    /// outlive the table, which `'a` enforces. Inserting a name that is
    /// already bound adds a second binding; lookups find whichever sits
    /// first in the chain.
    pub fn insert(&mut self, name: NameRef<'a>) -> Result<&mut Binding<'a>, AllocError> {
        assert!(!name.is_null(), "cannot bind the null name");

        if self.entries.is_empty() {
            self.resize(INITIAL_CAPACITY)?;
        }
        if self.free_head.is_none() {
            self.resize(self.entries.len() * 2)?;
        }

        let slot = self.place(name);
        self.size += 1;
        Ok(&mut self.entries[slot].binding)
    }

    /// Look up the index bound to `name`.
    pub fn find_index(&self, name: NameRef<'_>) -> Option<u32> {
        if self.entries.is_empty() {
            return None;
        }

        let mut slot = self.main_slot(name);
        loop {
            let entry = &self.entries[slot];
            if entry.binding.name == name {
                return Some(entry.binding.index);
            }
            match entry.next {
                Some(next) if !self.entries[next as usize].is_free() => slot = next as usize,
                _ => return None,
            }
        }
    }

    /// Resolve a variable reference. Index references come back verbatim
    /// with no bounds check.
    pub fn resolve(&self, var: &Var<'_>) -> Option<u32> {
        match var {
            Var::Index(index) => Some(*index),
            Var::Name(name) => self.find_index(name.alias()),
        }
    }

    #[inline]
    fn main_slot(&self, name: NameRef<'_>) -> usize {
        name.fnv_hash() as usize % self.entries.len()
    }

    /// Claim a slot for `name` and return it. A free slot must exist.
    fn place(&mut self, name: NameRef<'a>) -> usize {
        let main = self.main_slot(name);

        let slot = if self.entries[main].is_free() {
            let Entry { next, prev, .. } = self.entries[main];
            if let Some(next) = next {
                self.entries[next as usize].prev = prev;
            }
            match prev {
                Some(prev) => self.entries[prev as usize].next = next,
                None => self.free_head = next,
            }
            self.entries[main].next = None;
            main
        } else {
            let Some(free) = self.free_head else {
                panic!("binding hash has no free slot for a colliding entry");
            };
            let free = free as usize;
            self.free_head = self.entries[free].next;
            if let Some(next) = self.free_head {
                self.entries[next as usize].prev = None;
            }

            let occupant_main = self.main_slot(self.entries[main].binding.name);
            if occupant_main == main {
                // The occupant heads this chain; the new entry becomes its
                // second link.
                self.entries[free].next = self.entries[main].next;
                self.entries[main].next = Some(free as u32);
                free
            } else {
                // The occupant was displaced from another chain. Move it out
                // and take the natural slot.
                let mut link = occupant_main;
                while self.entries[link].next != Some(main as u32) {
                    match self.entries[link].next {
                        Some(next) => link = next as usize,
                        None => unreachable!("displaced entry is missing from its chain"),
                    }
                }
                self.entries[link].next = Some(free as u32);
                self.entries[free] = self.entries[main];
                self.entries[main].next = None;
                main
            }
        };

        let entry = &mut self.entries[slot];
        entry.binding = Binding { name, index: 0 };
        entry.prev = None;
        slot
    }

    /// Reallocate to `capacity` slots and re-insert every occupied entry.
    fn resize(&mut self, capacity: usize) -> Result<(), AllocError> {
        debug_assert!(capacity > 0);
        if u32::try_from(capacity).is_err() {
            return Err(AllocError::CapacityOverflow(capacity));
        }

        let mut entries = Vec::new();
        entries
            .try_reserve_exact(capacity)
            .map_err(|source| AllocError::reserve(capacity, source))?;
        // The free list runs from the last slot down to slot 0.
        entries.extend((0..capacity).map(|i| Entry {
            binding: Binding::FREE,
            next: i.checked_sub(1).map(|prev| prev as u32),
            prev: (i + 1 < capacity).then(|| (i + 1) as u32),
        }));

        let old = std::mem::replace(
            self,
            BindingHash {
                entries,
                size: 0,
                free_head: Some((capacity - 1) as u32),
            },
        );

        for entry in old.entries.iter().filter(|entry| !entry.is_free()) {
            let slot = self.place(entry.binding.name);
            self.entries[slot].binding.index = entry.binding.index;
            self.size += 1;
        }

        tracing::trace!(
            target: "wastree::binding_hash",
            old_capacity = old.entries.len(),
            new_capacity = capacity,
            occupied = self.size,
            "resized binding hash"
        );
        Ok(())
    }

    #[cfg(test)]
    fn slot_of(&self, name: NameRef<'_>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.binding.name == name)
    }

    #[cfg(test)]
    fn free_slots(&self) -> usize {
        let mut count = 0;
        let mut cursor = self.free_head;
        while let Some(slot) = cursor {
            assert!(self.entries[slot as usize].is_free());
            count += 1;
            cursor = self.entries[slot as usize].next;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wastree_core::name::{fnv1a, Name};

    fn names(count: usize) -> Vec<Vec<u8>> {
        (0..count).map(|i| format!("$n{i}").into_bytes()).collect()
    }

    /// Generated names whose natural slot at `capacity` is `slot`.
    fn names_in_slot(slot: usize, capacity: usize, count: usize) -> Vec<Vec<u8>> {
        (0..)
            .map(|i| format!("$c{i}").into_bytes())
            .filter(|bytes| fnv1a(bytes) as usize % capacity == slot)
            .take(count)
            .collect()
    }

    #[test]
    fn test_new_table_is_uninitialized() {
        let hash = BindingHash::new();
        assert_eq!(hash.capacity(), 0);
        assert!(hash.is_empty());
        assert_eq!(hash.find_index(Name::new(b"$x").alias()), None);
    }

    #[test]
    fn test_first_insert_initializes_capacity() {
        let decl = Name::new(b"$x");
        let mut hash = BindingHash::new();
        hash.insert(decl.alias()).unwrap().index = 5;
        assert_eq!(hash.capacity(), INITIAL_CAPACITY);
        assert_eq!(hash.len(), 1);
        assert_eq!(hash.free_slots(), INITIAL_CAPACITY - 1);
        assert_eq!(hash.find_index(decl.alias()), Some(5));
    }

    #[test]
    fn test_insert_leaves_index_zero() {
        let decl = Name::new(b"$x");
        let mut hash = BindingHash::new();
        let binding = hash.insert(decl.alias()).unwrap();
        assert_eq!(binding.index, 0);
        assert!(binding.name() == decl.alias());
    }

    #[test]
    fn test_uncolliding_entry_takes_natural_slot() {
        let decl = Name::new(b"$x");
        let mut hash = BindingHash::new();
        hash.insert(decl.alias()).unwrap();
        let natural = fnv1a(b"$x") as usize % INITIAL_CAPACITY;
        assert_eq!(hash.slot_of(decl.alias()), Some(natural));
    }

    #[test]
    fn test_three_way_collision() {
        let bytes = names_in_slot(3, INITIAL_CAPACITY, 3);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();

        let mut hash = BindingHash::new();
        for (i, decl) in decls.iter().enumerate() {
            hash.insert(decl.alias()).unwrap().index = i as u32 * 10;
        }

        assert_eq!(hash.capacity(), INITIAL_CAPACITY);
        assert_eq!(hash.slot_of(decls[0].alias()), Some(3));
        for (i, decl) in decls.iter().enumerate() {
            assert_eq!(hash.find_index(decl.alias()), Some(i as u32 * 10));
        }
    }

    #[test]
    fn test_collision_is_linked_second_in_chain() {
        let bytes = names_in_slot(2, INITIAL_CAPACITY, 3);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();

        let mut hash = BindingHash::new();
        for decl in &decls {
            hash.insert(decl.alias()).unwrap();
        }

        // head -> third -> second
        let head = hash.slot_of(decls[0].alias()).unwrap();
        let second = hash.entries[head].next.unwrap() as usize;
        let third = hash.entries[second].next.unwrap() as usize;
        assert!(hash.entries[second].binding.name() == decls[2].alias());
        assert!(hash.entries[third].binding.name() == decls[1].alias());
        assert_eq!(hash.entries[third].next, None);
    }

    #[test]
    fn test_natural_owner_relocates_displaced_entry() {
        let first = names_in_slot(1, INITIAL_CAPACITY, 2);
        let a = Name::new(&first[0]);
        let b = Name::new(&first[1]);

        let mut hash = BindingHash::new();
        hash.insert(a.alias()).unwrap().index = 0;
        hash.insert(b.alias()).unwrap().index = 1;

        // `b` was displaced into the free head.
        let displaced_at = hash.slot_of(b.alias()).unwrap();
        assert_ne!(displaced_at, 1);

        let owner_bytes = names_in_slot(displaced_at, INITIAL_CAPACITY, 1);
        let c = Name::new(&owner_bytes[0]);
        hash.insert(c.alias()).unwrap().index = 2;

        assert_eq!(hash.slot_of(c.alias()), Some(displaced_at));
        assert_ne!(hash.slot_of(b.alias()), Some(displaced_at));
        assert_eq!(hash.find_index(a.alias()), Some(0));
        assert_eq!(hash.find_index(b.alias()), Some(1));
        assert_eq!(hash.find_index(c.alias()), Some(2));
        assert_eq!(hash.len(), 3);
        assert_eq!(hash.free_slots(), INITIAL_CAPACITY - 3);
    }

    #[test]
    fn test_round_trip_any_order() {
        let bytes = names(40);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();

        let mut forward = BindingHash::new();
        let mut backward = BindingHash::new();
        for (i, decl) in decls.iter().enumerate() {
            forward.insert(decl.alias()).unwrap().index = i as u32;
        }
        for (i, decl) in decls.iter().enumerate().rev() {
            backward.insert(decl.alias()).unwrap().index = i as u32;
        }

        for (i, decl) in decls.iter().enumerate() {
            assert_eq!(forward.find_index(decl.alias()), Some(i as u32));
            assert_eq!(backward.find_index(decl.alias()), Some(i as u32));
        }
    }

    #[test]
    fn test_resize_preserves_mapping() {
        let bytes = names(20);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();

        let mut hash = BindingHash::new();
        let mut resizes = 0;
        for (i, decl) in decls.iter().enumerate() {
            let before = hash.capacity();
            hash.insert(decl.alias()).unwrap().index = i as u32;
            if before != 0 && hash.capacity() != before {
                resizes += 1;
                assert_eq!(hash.capacity(), before * 2);
            }
            for (j, earlier) in decls[..=i].iter().enumerate() {
                assert_eq!(hash.find_index(earlier.alias()), Some(j as u32));
            }
        }

        assert!(resizes >= 2);
        assert_eq!(hash.capacity(), 32);
        assert_eq!(hash.len(), 20);
        assert_eq!(hash.free_slots(), 12);
    }

    #[test]
    fn test_placement_is_deterministic() {
        let bytes = names(12);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();

        let build = || {
            let mut hash = BindingHash::new();
            for decl in &decls {
                hash.insert(decl.alias()).unwrap();
            }
            decls
                .iter()
                .map(|decl| hash.slot_of(decl.alias()))
                .collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_null_name_is_never_found() {
        let decl = Name::new(b"$x");
        let mut hash = BindingHash::new();
        hash.insert(decl.alias()).unwrap();
        assert_eq!(hash.find_index(NameRef::NULL), None);
    }

    #[test]
    #[should_panic(expected = "cannot bind the null name")]
    fn test_binding_null_name_panics() {
        let mut hash = BindingHash::new();
        let _ = hash.insert(NameRef::NULL);
    }

    #[test]
    fn test_iter_yields_occupied_bindings() {
        let bytes = names(5);
        let decls: Vec<_> = bytes.iter().map(|b| Name::new(b)).collect();
        let mut hash = BindingHash::new();
        for (i, decl) in decls.iter().enumerate() {
            hash.insert(decl.alias()).unwrap().index = i as u32;
        }
        let mut indices: Vec<u32> = hash.iter().map(|b| b.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}
