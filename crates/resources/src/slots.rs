//! Logical pid slot table
//!
//! Maps the bounded pid space `0..max_running` to live worker handles.
//! Assignment scans round-robin from the slot after the last one handed
//! out, so pids are not reused immediately after termination.

use ossim_errors::SpawnError;

/// Fixed-size table of worker slots, generic over the stored handle
#[derive(Debug)]
pub struct SlotTable<T> {
    slots: Vec<Option<T>>,
    last_assigned: Option<usize>,
}

impl<T> SlotTable<T> {
    /// Create a table with `max_running` empty slots
    #[must_use]
    pub fn new(max_running: usize) -> Self {
        Self {
            slots: (0..max_running).map(|_| None).collect(),
            last_assigned: None,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live slots
    #[must_use]
    pub fn running(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_live(&self, pid: usize) -> bool {
        self.slots.get(pid).is_some_and(Option::is_some)
    }

    #[must_use]
    pub fn get(&self, pid: usize) -> Option<&T> {
        self.slots.get(pid).and_then(Option::as_ref)
    }

    /// Iterate live pids in ascending order
    pub fn live_pids(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(pid, slot)| slot.as_ref().map(|_| pid))
    }

    /// Bind `handle` to the next free logical pid, round-robin
    ///
    /// # Errors
    ///
    /// Returns an error when every slot is live. The coordinator's running
    /// count gate makes that unreachable in normal operation.
    pub fn assign(&mut self, handle: T) -> Result<usize, SpawnError> {
        let start = self.last_assigned.map_or(0, |last| last + 1);
        for offset in 0..self.slots.len() {
            let pid = (start + offset) % self.slots.len();
            if self.slots[pid].is_none() {
                self.slots[pid] = Some(handle);
                self.last_assigned = Some(pid);
                return Ok(pid);
            }
        }
        Err(SpawnError::NoFreeSlot {
            max_running: self.slots.len(),
        })
    }

    /// Clear a slot, returning its handle
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is already empty.
    pub fn take(&mut self, pid: usize) -> Result<T, SpawnError> {
        self.slots
            .get_mut(pid)
            .and_then(Option::take)
            .ok_or(SpawnError::SlotEmpty { pid })
    }
}
