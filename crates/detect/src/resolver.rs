//! Deadlock resolution by victim termination
//!
//! One victim per iteration: prefer a deadlocked process whose holdings of
//! some other deadlocked process's requested class cover that request;
//! otherwise fall back to the deadlocked process with the single largest
//! allocation of any class seen during the scan. Kill, reclaim, re-detect,
//! repeat until the deadlocked set is empty.

use crate::{detect, Matrices};
use ossim_errors::{Error, ResolveError};
use ossim_events::{EventEmitter, SimEvent};
use ossim_resources::{ResourceTable, SlotTable};
use tracing::debug;

/// Detect and resolve deadlock, killing victims until the state is safe
///
/// `kill` receives each victim's pid and its slot handle; the coordinator
/// uses it to deliver the kill signal. Returns the number of processes
/// killed so the caller can adjust its running count and re-scan queues.
///
/// # Errors
///
/// Fatal if no victim is selectable for a non-empty deadlocked set, if a
/// victim's slot is already empty, or if reclaiming corrupts the table.
pub fn resolve<T, E: EventEmitter>(
    table: &mut ResourceTable,
    slots: &mut SlotTable<T>,
    events: &E,
    kill: &mut dyn FnMut(usize, T),
) -> Result<usize, Error> {
    let running_at_start = slots.running();
    let mut killed = 0;

    loop {
        let matrices = Matrices::snapshot(table, slots);
        let deadlocked = detect(&matrices);
        if deadlocked.is_empty() {
            break;
        }
        events.emit(SimEvent::DeadlockedSet {
            pids: deadlocked.clone(),
        });

        if killed == 0 {
            events.emit(SimEvent::ResolutionAttempt);
        }

        let victim = select_victim(table, &matrices, &deadlocked)?;
        debug!(victim, "killing deadlock victim");

        let handle = slots
            .take(victim)
            .map_err(|_| ResolveError::DeadVictim { pid: victim })?;
        kill(victim, handle);

        let released = table.reclaim_all(victim)?;
        table.validate()?;
        events.emit(SimEvent::ProcessKilled { pid: victim });
        events.emit(SimEvent::Reclaimed {
            pid: victim,
            released,
        });

        killed += 1;
    }

    if killed > 0 {
        events.emit(SimEvent::ResolutionSucceeded {
            killed,
            running_at_start,
        });
    }

    Ok(killed)
}

/// Pick one victim from a non-empty deadlocked set
fn select_victim(
    table: &ResourceTable,
    matrices: &Matrices,
    deadlocked: &[usize],
) -> Result<usize, ResolveError> {
    let mut max_allocation = 0;
    let mut fallback = None;

    for &pid in deadlocked {
        let request = table
            .pending_request(pid)
            .ok_or(ResolveError::MissingRequest { pid })?;

        for &other in deadlocked {
            if other == pid {
                continue;
            }
            let held = matrices.allocation[other][request.resource];
            if held > max_allocation {
                max_allocation = held;
                fallback = Some(other);
            }
            // A process holding enough to satisfy the request is the victim
            if held >= request.quantity {
                return Ok(other);
            }
        }
    }

    fallback.ok_or_else(|| ResolveError::NoVictim {
        deadlocked: deadlocked.to_vec(),
    })
}
