//! Single-integer wire encoding of worker messages
//!
//! `encoded = sign * ((max_instances + 1) * resource + quantity)`.
//! Zero means termination, negative means release, positive means request.
//! The modulus leaves exactly enough room for quantities `1..=max_instances`,
//! so decoding is a divmod.

use ossim_errors::ProtocolError;
use serde::{Deserialize, Serialize};

/// A decoded worker-to-coordinator message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Request `quantity` instances of `resource`
    Request { resource: usize, quantity: u32 },
    /// Return `quantity` held instances of `resource`
    Release { resource: usize, quantity: u32 },
    /// Voluntary termination notice
    Terminate,
}

/// Encoder/decoder bound to one simulation's resource geometry
#[derive(Debug, Clone, Copy)]
pub struct WireCodec {
    modulus: i64,
    max_instances: u32,
    classes: usize,
}

impl WireCodec {
    /// Create a codec for `classes` resource classes of up to
    /// `max_instances` instances each
    #[must_use]
    pub fn new(classes: usize, max_instances: u32) -> Self {
        Self {
            modulus: i64::from(max_instances) + 1,
            max_instances,
            classes,
        }
    }

    /// Encode a message into its wire integer
    ///
    /// # Errors
    ///
    /// Returns an error if the resource id or quantity does not fit the
    /// codec's geometry.
    pub fn encode(&self, message: WorkerMessage) -> Result<i64, ProtocolError> {
        match message {
            WorkerMessage::Terminate => Ok(0),
            WorkerMessage::Request { resource, quantity } => {
                self.encode_pair(resource, quantity)
            }
            WorkerMessage::Release { resource, quantity } => {
                Ok(-self.encode_pair(resource, quantity)?)
            }
        }
    }

    /// Decode a wire integer back into a message
    ///
    /// # Errors
    ///
    /// Returns an error when the payload carries a zero quantity or an
    /// out-of-range resource id.
    pub fn decode(&self, payload: i64) -> Result<WorkerMessage, ProtocolError> {
        if payload == 0 {
            return Ok(WorkerMessage::Terminate);
        }

        let magnitude = payload.unsigned_abs();
        let modulus = self.modulus.unsigned_abs();
        let quantity = u32::try_from(magnitude % modulus).unwrap_or(0);
        let resource = usize::try_from(magnitude / modulus).unwrap_or(usize::MAX);

        if quantity == 0 {
            return Err(ProtocolError::ZeroQuantity { payload });
        }
        if resource >= self.classes {
            return Err(ProtocolError::ResourceOutOfRange {
                resource,
                classes: self.classes,
            });
        }

        if payload > 0 {
            Ok(WorkerMessage::Request { resource, quantity })
        } else {
            Ok(WorkerMessage::Release { resource, quantity })
        }
    }

    fn encode_pair(&self, resource: usize, quantity: u32) -> Result<i64, ProtocolError> {
        if resource >= self.classes {
            return Err(ProtocolError::ResourceOutOfRange {
                resource,
                classes: self.classes,
            });
        }
        if quantity == 0 {
            return Err(ProtocolError::ZeroQuantity { payload: 0 });
        }
        if quantity > self.max_instances {
            return Err(ProtocolError::QuantityTooLarge {
                quantity,
                max: self.max_instances,
            });
        }
        let resource = i64::try_from(resource).map_err(|_| ProtocolError::ResourceOutOfRange {
            resource,
            classes: self.classes,
        })?;
        Ok(self.modulus * resource + i64::from(quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_release_terminate_signs() {
        let codec = WireCodec::new(20, 10);
        let request = WorkerMessage::Request {
            resource: 3,
            quantity: 7,
        };
        let release = WorkerMessage::Release {
            resource: 3,
            quantity: 7,
        };

        let encoded_request = codec.encode(request).unwrap();
        let encoded_release = codec.encode(release).unwrap();
        assert!(encoded_request > 0);
        assert_eq!(encoded_release, -encoded_request);
        assert_eq!(codec.encode(WorkerMessage::Terminate).unwrap(), 0);

        assert_eq!(codec.decode(encoded_request).unwrap(), request);
        assert_eq!(codec.decode(encoded_release).unwrap(), release);
        assert_eq!(codec.decode(0).unwrap(), WorkerMessage::Terminate);
    }

    #[test]
    fn classic_geometry_example() {
        // max 10 instances: modulus 11, so R3 x 7 encodes as 40
        let codec = WireCodec::new(20, 10);
        let encoded = codec
            .encode(WorkerMessage::Request {
                resource: 3,
                quantity: 7,
            })
            .unwrap();
        assert_eq!(encoded, 40);
    }

    #[test]
    fn rejects_zero_quantity() {
        let codec = WireCodec::new(20, 10);
        assert!(codec
            .encode(WorkerMessage::Request {
                resource: 0,
                quantity: 0
            })
            .is_err());
        // 22 = 2 * modulus + 0, a zero quantity on the wire
        assert!(codec.decode(22).is_err());
    }

    #[test]
    fn rejects_out_of_range_resource() {
        let codec = WireCodec::new(4, 10);
        assert!(codec
            .encode(WorkerMessage::Request {
                resource: 4,
                quantity: 1
            })
            .is_err());
        let wide = WireCodec::new(20, 10);
        let encoded = wide
            .encode(WorkerMessage::Request {
                resource: 9,
                quantity: 1,
            })
            .unwrap();
        assert!(codec.decode(encoded).is_err());
    }

    #[test]
    fn rejects_oversized_quantity() {
        let codec = WireCodec::new(20, 10);
        assert!(codec
            .encode(WorkerMessage::Request {
                resource: 1,
                quantity: 11
            })
            .is_err());
    }
}
