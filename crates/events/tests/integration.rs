//! Integration tests for events

#[cfg(test)]
mod tests {
    use ossim_events::*;

    #[tokio::test]
    async fn test_emit_through_sender() {
        let (tx, mut rx) = channel();

        tx.emit(SimEvent::WorkerSpawned {
            pid: 0,
            launched: 1,
        });
        tx.emit(SimEvent::ProcessKilled { pid: 0 });

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, SimEvent::WorkerSpawned { .. }));

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, SimEvent::ProcessKilled { pid: 0 }));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit(SimEvent::ResolutionAttempt);
    }

    #[test]
    fn test_none_emitter_is_silent() {
        let emitter: Option<EventSender> = None;
        emitter.emit(SimEvent::WorkerCompleted { pid: 3 });
    }

    #[test]
    fn test_event_serialization() {
        let event = SimEvent::DeadlockedSet { pids: vec![1, 4] };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""event":"deadlocked_set""#));
    }

    #[test]
    fn test_kill_events_are_warnings() {
        assert_eq!(
            SimEvent::ProcessKilled { pid: 2 }.level(),
            tracing::Level::WARN
        );
        assert_eq!(
            SimEvent::WorkerCompleted { pid: 2 }.level(),
            tracing::Level::INFO
        );
    }
}
