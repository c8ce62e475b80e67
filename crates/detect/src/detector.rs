//! The deadlock detection algorithm
//!
//! A reachability fixed point: a process whose whole request fits in the
//! working availability can finish and return everything it holds, which
//! may unblock processes scanned earlier, so the scan restarts from pid 0
//! after every new finish rather than making a single linear pass.

use crate::Matrices;

/// Compute the deadlocked set, ascending by pid
///
/// Pure and side-effect free; running it twice on the same snapshot gives
/// the same answer.
#[must_use]
pub fn detect(matrices: &Matrices) -> Vec<usize> {
    let pids = matrices.allocation.len();
    let mut work = matrices.available.clone();
    let mut finish = vec![false; pids];

    let mut pid = 0;
    while pid < pids {
        if !finish[pid] && request_fits(&matrices.request[pid], &work) {
            finish[pid] = true;
            for (w, held) in work.iter_mut().zip(&matrices.allocation[pid]) {
                *w += held;
            }
            // A finish can unblock any earlier pid
            pid = 0;
            continue;
        }
        pid += 1;
    }

    finish
        .iter()
        .enumerate()
        .filter_map(|(pid, &done)| (!done).then_some(pid))
        .collect()
}

fn request_fits(request: &[u32], work: &[u32]) -> bool {
    request.iter().zip(work).all(|(req, avail)| req <= avail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ossim_resources::{ResourceTable, SlotTable};

    fn live_slots(count: usize, capacity: usize) -> SlotTable<()> {
        let mut slots = SlotTable::new(capacity);
        for _ in 0..count {
            slots.assign(()).unwrap();
        }
        slots
    }

    #[test]
    fn empty_system_is_safe() {
        let table = ResourceTable::with_instances(&[1, 1], 4);
        let slots = live_slots(0, 4);
        let m = Matrices::snapshot(&table, &slots);
        assert!(detect(&m).is_empty());
    }

    #[test]
    fn cross_hold_cycle_is_deadlocked() {
        // P0 holds R0, wants R1; P1 holds R1, wants R0
        let mut table = ResourceTable::with_instances(&[1, 1], 4);
        let slots = live_slots(2, 4);
        table.try_grant(0, 0, 1).unwrap();
        table.try_grant(1, 1, 1).unwrap();
        table.enqueue_request(0, 1, 1).unwrap();
        table.enqueue_request(1, 0, 1).unwrap();

        let m = Matrices::snapshot(&table, &slots);
        assert_eq!(detect(&m), vec![0, 1]);
    }

    #[test]
    fn waiting_on_a_finishable_holder_is_not_deadlock() {
        // P1 waits on P0, but P0 has no request and can finish
        let mut table = ResourceTable::with_instances(&[1], 4);
        let slots = live_slots(2, 4);
        table.try_grant(0, 0, 1).unwrap();
        table.enqueue_request(1, 0, 1).unwrap();

        let m = Matrices::snapshot(&table, &slots);
        assert!(detect(&m).is_empty());
    }

    #[test]
    fn restart_reaches_earlier_pids() {
        // P0 waits on what P2 holds; P2 can finish only once P1's
        // release flows through the fixed point. Chain: P1 free, P2
        // needs P1's holdings, P0 needs P2's.
        let mut table = ResourceTable::with_instances(&[2, 2], 4);
        let slots = live_slots(3, 4);
        table.try_grant(1, 0, 2).unwrap();
        table.try_grant(2, 1, 2).unwrap();
        table.enqueue_request(2, 0, 1).unwrap();
        table.enqueue_request(0, 1, 1).unwrap();

        let m = Matrices::snapshot(&table, &slots);
        assert!(detect(&m).is_empty());
    }

    #[test]
    fn detector_is_idempotent() {
        let mut table = ResourceTable::with_instances(&[1, 1], 4);
        let slots = live_slots(2, 4);
        table.try_grant(0, 0, 1).unwrap();
        table.try_grant(1, 1, 1).unwrap();
        table.enqueue_request(0, 1, 1).unwrap();
        table.enqueue_request(1, 0, 1).unwrap();

        let m = Matrices::snapshot(&table, &slots);
        assert_eq!(detect(&m), detect(&m));
    }
}
