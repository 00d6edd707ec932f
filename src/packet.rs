//! Opaque packet handle.
//!
//! The core never inspects packet contents; it only owns and forwards
//! packets between ports. Elements that do look at payloads get cheap
//! shared access through [`bytes::Bytes`].

use bytes::Bytes;

/// A network packet moving through the element graph.
///
/// Ownership passes from caller to callee at every `push` boundary and
/// from callee to caller at every `pull` boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    data: Bytes,
}

impl Packet {
    /// Create a packet from a payload.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// Create an empty packet.
    pub fn empty() -> Self {
        Self {
            data: Bytes::new(),
        }
    }

    /// Get the packet payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the packet, returning its payload.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}

impl std::fmt::Debug for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packet").field("len", &self.len()).finish()
    }
}

impl From<Bytes> for Packet {
    fn from(data: Bytes) -> Self {
        Self { data }
    }
}

impl From<Vec<u8>> for Packet {
    fn from(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }
}

impl From<&'static [u8]> for Packet {
    fn from(data: &'static [u8]) -> Self {
        Self {
            data: Bytes::from_static(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_payload() {
        let p = Packet::new(vec![1u8, 2, 3]);
        assert_eq!(p.data(), &[1, 2, 3]);
        assert_eq!(p.len(), 3);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_empty_packet() {
        let p = Packet::empty();
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
    }
}
