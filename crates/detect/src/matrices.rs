//! Matrix snapshot of the resource table
//!
//! Rows are sized to the full logical pid space rather than the live
//! process count, matching the bounded slot table; dead pids contribute
//! zero rows and finish trivially in the detector.

use ossim_resources::{ResourceTable, SlotTable};

/// Allocation, request, and availability state at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrices {
    /// `allocation[pid][resource]`: instances currently held
    pub allocation: Vec<Vec<u32>>,
    /// `request[pid][resource]`: instances currently queued for
    ///
    /// Summed over queue entries, though the single-outstanding-request
    /// assumption means at most one entry per pid contributes.
    pub request: Vec<Vec<u32>>,
    /// `available[resource]`: unclaimed instances
    pub available: Vec<u32>,
    /// Which pids are bound to live workers
    pub live: Vec<bool>,
}

impl Matrices {
    /// Snapshot the table and slot state
    #[must_use]
    pub fn snapshot<T>(table: &ResourceTable, slots: &SlotTable<T>) -> Self {
        let pids = table.max_running();
        let classes = table.classes();

        let mut allocation = vec![vec![0u32; classes]; pids];
        let mut request = vec![vec![0u32; classes]; pids];
        let mut available = vec![0u32; classes];

        for resource in 0..classes {
            let class = table.class(resource);
            available[resource] = class.available();
            for (pid, row) in allocation.iter_mut().enumerate() {
                row[resource] = class.allocation(pid);
            }
            for pending in class.waiting().iter() {
                request[pending.pid][resource] += pending.quantity;
            }
        }

        let live = (0..pids).map(|pid| slots.is_live(pid)).collect();

        Self {
            allocation,
            request,
            available,
            live,
        }
    }

    /// Number of live pids in the snapshot
    #[must_use]
    pub fn running(&self) -> usize {
        self.live.iter().filter(|&&l| l).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_allocations_and_queues() {
        let mut table = ResourceTable::with_instances(&[3, 2], 3);
        let mut slots: SlotTable<()> = SlotTable::new(3);
        slots.assign(()).unwrap();
        slots.assign(()).unwrap();

        table.try_grant(0, 0, 2).unwrap();
        table.enqueue_request(1, 0, 2).unwrap();

        let m = Matrices::snapshot(&table, &slots);
        assert_eq!(m.allocation[0], vec![2, 0]);
        assert_eq!(m.request[1], vec![2, 0]);
        assert_eq!(m.available, vec![1, 2]);
        assert_eq!(m.live, vec![true, true, false]);
        assert_eq!(m.running(), 2);
    }
}
