//! NPDU Codec
//!
//! The Network Protocol Data Unit sits between the BVLC link header and the
//! APDU payload. It carries the protocol version, a control-flags bitfield,
//! and optionally routing addresses and a hop count, depending on which
//! bits of `control_flags` are set.
//!
//! # Examples
//!
//! ```rust
//! use bacnet_rs::network::Npdu;
//!
//! let npdu = Npdu::global_broadcast();
//! let encoded = npdu.encode();
//! let (decoded, consumed) = Npdu::decode(&encoded).unwrap();
//! assert_eq!(consumed, encoded.len());
//! assert_eq!(decoded.destination.unwrap().network, 0xFFFF);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::{too_short, Result};

/// Expected NPDU protocol version.
pub const BACNET_PROTOCOL_VERSION: u8 = 1;

const CONTROL_DESTINATION_PRESENT: u8 = 0x20;
const CONTROL_SOURCE_PRESENT: u8 = 0x08;
const CONTROL_EXPECTING_REPLY: u8 = 0x04;
const CONTROL_PRIORITY_MASK: u8 = 0x03;
const CONTROL_NETWORK_LAYER_MESSAGE: u8 = 0x80;

/// A routing-layer address: a network number plus an address of
/// `addr_len` bytes (0 length means the broadcast address for that
/// network).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkAddress {
    pub network: u16,
    pub address: Vec<u8>,
}

/// Network Protocol Data Unit header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Npdu {
    pub version: u8,
    pub control_flags: u8,
    pub destination: Option<NetworkAddress>,
    pub source: Option<NetworkAddress>,
    pub hop_count: Option<u8>,
}

impl Default for Npdu {
    fn default() -> Self {
        Self {
            version: BACNET_PROTOCOL_VERSION,
            control_flags: 0,
            destination: None,
            source: None,
            hop_count: None,
        }
    }
}

impl Npdu {
    /// An NPDU with no routing addresses, suitable for a local-network
    /// unicast request.
    pub fn new() -> Self {
        Self::default()
    }

    /// An NPDU addressed to the global broadcast network (0xFFFF, the
    /// zero-length broadcast address), as used by `Who-Is`.
    pub fn global_broadcast() -> Self {
        Self {
            version: BACNET_PROTOCOL_VERSION,
            control_flags: CONTROL_DESTINATION_PRESENT,
            destination: Some(NetworkAddress {
                network: 0xFFFF,
                address: Vec::new(),
            }),
            source: None,
            hop_count: Some(0xFF),
        }
    }

    /// True if the "network layer message" control bit is set, i.e. this
    /// NPDU carries a routing message rather than an APDU. This codec
    /// recognizes the bit (so the cursor still advances correctly) but does
    /// not implement routing message bodies.
    pub fn is_network_layer_message(&self) -> bool {
        self.control_flags & CONTROL_NETWORK_LAYER_MESSAGE != 0
    }

    pub fn expecting_reply(&self) -> bool {
        self.control_flags & CONTROL_EXPECTING_REPLY != 0
    }

    pub fn priority(&self) -> u8 {
        self.control_flags & CONTROL_PRIORITY_MASK
    }

    /// Number of bytes this header occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        let mut len = 2;
        if let Some(dest) = &self.destination {
            len += 2 + 1 + dest.address.len();
        }
        if let Some(src) = &self.source {
            len += 2 + 1 + src.address.len();
        }
        if self.destination.is_some() {
            len += 1; // hop count
        }
        len
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let mut control = self.control_flags;
        if self.destination.is_some() {
            control |= CONTROL_DESTINATION_PRESENT;
        } else {
            control &= !CONTROL_DESTINATION_PRESENT;
        }
        if self.source.is_some() {
            control |= CONTROL_SOURCE_PRESENT;
        } else {
            control &= !CONTROL_SOURCE_PRESENT;
        }

        buf.push(self.version);
        buf.push(control);

        if let Some(dest) = &self.destination {
            buf.extend_from_slice(&dest.network.to_be_bytes());
            buf.push(dest.address.len() as u8);
            buf.extend_from_slice(&dest.address);
        }
        if let Some(src) = &self.source {
            buf.extend_from_slice(&src.network.to_be_bytes());
            buf.push(src.address.len() as u8);
            buf.extend_from_slice(&src.address);
        }
        if self.destination.is_some() {
            buf.push(self.hop_count.unwrap_or(0xFF));
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf);
        buf
    }

    /// Decodes an NPDU header from the front of `bytes`, returning it along
    /// with the number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Npdu, usize)> {
        if bytes.len() < 2 {
            return Err(too_short("reading NPDU version/control", 2, bytes.len()));
        }

        let version = bytes[0];
        let control_flags = bytes[1];
        if control_flags & !(CONTROL_NETWORK_LAYER_MESSAGE
            | CONTROL_DESTINATION_PRESENT
            | CONTROL_SOURCE_PRESENT
            | CONTROL_EXPECTING_REPLY
            | CONTROL_PRIORITY_MASK)
            != 0
        {
            log::trace!("NPDU control flags 0x{:02X} set bits this codec does not interpret", control_flags);
        }
        let mut offset = 2;

        let destination = if control_flags & CONTROL_DESTINATION_PRESENT != 0 {
            if bytes.len() < offset + 3 {
                return Err(too_short("reading NPDU destination network/length", offset + 3, bytes.len()));
            }
            let network = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
            let addr_len = bytes[offset + 2] as usize;
            offset += 3;
            if bytes.len() < offset + addr_len {
                return Err(too_short("reading NPDU destination address", offset + addr_len, bytes.len()));
            }
            let address = bytes[offset..offset + addr_len].to_vec();
            offset += addr_len;
            Some(NetworkAddress { network, address })
        } else {
            None
        };

        let source = if control_flags & CONTROL_SOURCE_PRESENT != 0 {
            if bytes.len() < offset + 3 {
                return Err(too_short("reading NPDU source network/length", offset + 3, bytes.len()));
            }
            let network = u16::from_be_bytes([bytes[offset], bytes[offset + 1]]);
            let addr_len = bytes[offset + 2] as usize;
            offset += 3;
            if bytes.len() < offset + addr_len {
                return Err(too_short("reading NPDU source address", offset + addr_len, bytes.len()));
            }
            let address = bytes[offset..offset + addr_len].to_vec();
            offset += addr_len;
            Some(NetworkAddress { network, address })
        } else {
            None
        };

        let hop_count = if destination.is_some() {
            if bytes.len() < offset + 1 {
                return Err(too_short("reading NPDU hop count", offset + 1, bytes.len()));
            }
            let hc = bytes[offset];
            offset += 1;
            Some(hc)
        } else {
            None
        };

        Ok((
            Npdu {
                version,
                control_flags,
                destination,
                source,
                hop_count,
            },
            offset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_npdu_is_two_bytes() {
        let npdu = Npdu::new();
        let encoded = npdu.encode();
        assert_eq!(encoded, vec![BACNET_PROTOCOL_VERSION, 0]);
    }

    #[test]
    fn global_broadcast_round_trips() {
        let npdu = Npdu::global_broadcast();
        let encoded = npdu.encode();
        let (decoded, consumed) = Npdu::decode(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, npdu);
        assert_eq!(decoded.destination.unwrap().network, 0xFFFF);
    }

    #[test]
    fn whois_scenario_destination_is_ffff() {
        // 01 20 FF FF 00 FF from the WhoIs scenario in SPEC_FULL.md
        let bytes = [0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF];
        let (npdu, consumed) = Npdu::decode(&bytes).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(npdu.destination.unwrap().network, 0xFFFF);
        assert_eq!(npdu.hop_count, Some(0xFF));
    }

    #[test]
    fn source_and_destination_round_trip() {
        let npdu = Npdu {
            version: BACNET_PROTOCOL_VERSION,
            control_flags: 0,
            destination: Some(NetworkAddress {
                network: 7,
                address: vec![0x01, 0x02],
            }),
            source: Some(NetworkAddress {
                network: 9,
                address: vec![],
            }),
            hop_count: Some(255),
        };
        let encoded = npdu.encode();
        let (decoded, consumed) = Npdu::decode(&encoded).unwrap();
        assert_eq!(consumed, encoded.len());
        assert_eq!(decoded, npdu);
    }

    #[test]
    fn too_short_when_truncated() {
        assert!(Npdu::decode(&[]).is_err());
        assert!(Npdu::decode(&[0x01, 0x20]).is_err());
    }

    #[test]
    fn unknown_control_bits_preserved() {
        let bytes = [0x01, 0x40]; // bit 0x40 is reserved/unused here
        let (npdu, _) = Npdu::decode(&bytes).unwrap();
        assert_eq!(npdu.control_flags, 0x40);
    }
}
