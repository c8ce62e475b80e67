//! Integration tests for the wire protocol

use ossim_proto::{WireCodec, WorkerMessage};
use proptest::prelude::*;

proptest! {
    #[test]
    fn codec_round_trips_any_legal_message(
        resource in 0usize..20,
        quantity in 1u32..=10,
        release in any::<bool>(),
    ) {
        let codec = WireCodec::new(20, 10);
        let message = if release {
            WorkerMessage::Release { resource, quantity }
        } else {
            WorkerMessage::Request { resource, quantity }
        };
        let decoded = codec.decode(codec.encode(message).unwrap()).unwrap();
        prop_assert_eq!(decoded, message);
    }

    #[test]
    fn decode_never_yields_illegal_values(payload in any::<i64>()) {
        let codec = WireCodec::new(20, 10);
        if let Ok(message) = codec.decode(payload) {
            match message {
                WorkerMessage::Terminate => prop_assert_eq!(payload, 0),
                WorkerMessage::Request { resource, quantity }
                | WorkerMessage::Release { resource, quantity } => {
                    prop_assert!(resource < 20);
                    prop_assert!(quantity >= 1);
                }
            }
        }
    }
}
