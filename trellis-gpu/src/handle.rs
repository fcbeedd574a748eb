//! Opaque handle table.
//!
//! Host-side [`RenderBackend`] implementations store their concrete
//! objects here and hand nonzero `u32` ids across the boundary. Slot 0
//! is permanently reserved so `0` can serve as the universal invalid
//! handle. Released ids go onto a free list and are reused LIFO: the
//! most recently released id is the next one issued.
//!
//! There is no generation counter. A released id looked up before reuse
//! yields `None`; a released id looked up after reuse silently names the
//! new occupant. Not mixing up ids is caller discipline.
//!
//! [`RenderBackend`]: crate::backend::RenderBackend

enum Slot<T> {
    Occupied(T),
    /// Free-list link to the next free slot, `None` at the tail.
    Free(Option<u32>),
}

/// Dense slot table mapping nonzero `u32` handles to payloads.
pub struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    live: usize,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        // Slot 0 is never issued.
        Self {
            slots: vec![Slot::Free(None)],
            free_head: None,
            live: 0,
        }
    }

    /// Store `object` and return its handle. Reuses the most recently
    /// released id when one is available, otherwise appends a slot.
    pub fn allocate(&mut self, object: T) -> u32 {
        self.live += 1;
        match self.free_head {
            Some(id) => {
                let slot = &mut self.slots[id as usize];
                self.free_head = match slot {
                    Slot::Free(next) => *next,
                    Slot::Occupied(_) => unreachable!("free list points at occupied slot"),
                };
                *slot = Slot::Occupied(object);
                id
            }
            None => {
                self.slots.push(Slot::Occupied(object));
                (self.slots.len() - 1) as u32
            }
        }
    }

    /// Clear the slot and return its payload. Returns `None` for `0`,
    /// out-of-range ids, and already-free slots.
    pub fn release(&mut self, handle: u32) -> Option<T> {
        if handle == 0 || handle as usize >= self.slots.len() {
            return None;
        }
        let slot = &mut self.slots[handle as usize];
        if matches!(slot, Slot::Free(_)) {
            return None;
        }
        let freed = std::mem::replace(slot, Slot::Free(self.free_head));
        self.free_head = Some(handle);
        self.live -= 1;
        match freed {
            Slot::Occupied(object) => Some(object),
            Slot::Free(_) => unreachable!(),
        }
    }

    pub fn lookup(&self, handle: u32) -> Option<&T> {
        match self.slots.get(handle as usize)? {
            Slot::Occupied(object) if handle != 0 => Some(object),
            _ => None,
        }
    }

    pub fn lookup_mut(&mut self, handle: u32) -> Option<&mut T> {
        match self.slots.get_mut(handle as usize)? {
            Slot::Occupied(object) if handle != 0 => Some(object),
            _ => None,
        }
    }

    /// Number of live (occupied) slots.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

// ===================================================================
// Tests
// ===================================================================
