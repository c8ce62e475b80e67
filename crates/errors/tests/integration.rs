//! Integration tests for error types

#[cfg(test)]
mod tests {
    use ossim_errors::*;

    #[test]
    fn test_error_conversion() {
        let inv = InvariantError::OverRelease {
            pid: 3,
            resource: 1,
            quantity: 5,
            held: 2,
        };
        let err: Error = inv.into();
        assert!(matches!(err, Error::Invariant(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ResolveError::DeadVictim { pid: 7 };
        assert_eq!(err.to_string(), "selected victim P7 has no live process slot");
    }

    #[test]
    fn test_conservation_message_names_resource() {
        let err = InvariantError::ConservationViolated {
            resource: 4,
            available: 3,
            allocated: 9,
            instances: 10,
        };
        assert!(err.to_string().contains("R4"));
    }

    #[test]
    fn test_error_clone() {
        let err = SpawnError::NoFreeSlot { max_running: 18 };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
