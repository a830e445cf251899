//! BVLC Codec
//!
//! BACnet/IP wraps every NPDU in a four-byte BVLC (BACnet Virtual Link
//! Control) header: a fixed type byte, a function code, and a big-endian
//! total-length field covering the whole BVLC+NPDU+APDU frame.
//!
//! Only the two functions the covered services use are constructible
//! through [`BvlcHeader::new`]: `0x0A` (original-unicast-NPDU) and `0x0B`
//! (original-broadcast-NPDU). The wider BBMD/foreign-device function
//! catalog is recognized on decode (so those frames don't fail with a
//! misleading error) via [`BvlcFunction`], but nothing beyond the header
//! itself is interpreted for them.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::{too_short, BacnetError, Result};

/// BACnet/IP's fixed BVLC type byte.
pub const BVLC_TYPE: u8 = 0x81;

/// BVLC function codes. Only `OriginalUnicastNpdu` and
/// `OriginalBroadcastNpdu` are constructible by this crate; the rest are
/// recognized on decode for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvlcFunction {
    Result = 0x00,
    WriteBroadcastDistributionTable = 0x01,
    ReadBroadcastDistributionTable = 0x02,
    ReadBroadcastDistributionTableAck = 0x03,
    ForwardedNpdu = 0x04,
    RegisterForeignDevice = 0x05,
    ReadForeignDeviceTable = 0x06,
    ReadForeignDeviceTableAck = 0x07,
    DeleteForeignDeviceTableEntry = 0x08,
    DistributeBroadcastToNetwork = 0x09,
    OriginalUnicastNpdu = 0x0A,
    OriginalBroadcastNpdu = 0x0B,
    SecureBvll = 0x0C,
    Other(u8),
}

impl BvlcFunction {
    fn from_u8(value: u8) -> Self {
        match value {
            0x00 => BvlcFunction::Result,
            0x01 => BvlcFunction::WriteBroadcastDistributionTable,
            0x02 => BvlcFunction::ReadBroadcastDistributionTable,
            0x03 => BvlcFunction::ReadBroadcastDistributionTableAck,
            0x04 => BvlcFunction::ForwardedNpdu,
            0x05 => BvlcFunction::RegisterForeignDevice,
            0x06 => BvlcFunction::ReadForeignDeviceTable,
            0x07 => BvlcFunction::ReadForeignDeviceTableAck,
            0x08 => BvlcFunction::DeleteForeignDeviceTableEntry,
            0x09 => BvlcFunction::DistributeBroadcastToNetwork,
            0x0A => BvlcFunction::OriginalUnicastNpdu,
            0x0B => BvlcFunction::OriginalBroadcastNpdu,
            0x0C => BvlcFunction::SecureBvll,
            other => BvlcFunction::Other(other),
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            BvlcFunction::Result => 0x00,
            BvlcFunction::WriteBroadcastDistributionTable => 0x01,
            BvlcFunction::ReadBroadcastDistributionTable => 0x02,
            BvlcFunction::ReadBroadcastDistributionTableAck => 0x03,
            BvlcFunction::ForwardedNpdu => 0x04,
            BvlcFunction::RegisterForeignDevice => 0x05,
            BvlcFunction::ReadForeignDeviceTable => 0x06,
            BvlcFunction::ReadForeignDeviceTableAck => 0x07,
            BvlcFunction::DeleteForeignDeviceTableEntry => 0x08,
            BvlcFunction::DistributeBroadcastToNetwork => 0x09,
            BvlcFunction::OriginalUnicastNpdu => 0x0A,
            BvlcFunction::OriginalBroadcastNpdu => 0x0B,
            BvlcFunction::SecureBvll => 0x0C,
            BvlcFunction::Other(v) => v,
        }
    }

    /// True if decoding this frame further (as an NPDU+APDU) is supported.
    pub fn is_covered(self) -> bool {
        matches!(
            self,
            BvlcFunction::OriginalUnicastNpdu | BvlcFunction::OriginalBroadcastNpdu
        )
    }
}

/// Four-byte BVLC link header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvlcHeader {
    pub bvlc_type: u8,
    pub function: BvlcFunction,
    /// Total length of the BVLC+NPDU+APDU frame this header prefixes.
    pub length: u16,
}

impl BvlcHeader {
    pub fn new(function: BvlcFunction, length: u16) -> Self {
        Self {
            bvlc_type: BVLC_TYPE,
            function,
            length,
        }
    }

    pub fn unicast(length: u16) -> Self {
        Self::new(BvlcFunction::OriginalUnicastNpdu, length)
    }

    pub fn broadcast(length: u16) -> Self {
        Self::new(BvlcFunction::OriginalBroadcastNpdu, length)
    }

    pub const fn encoded_len() -> usize {
        4
    }

    pub fn encode(&self) -> Vec<u8> {
        let len = self.length.to_be_bytes();
        let mut buf = Vec::with_capacity(4);
        buf.push(self.bvlc_type);
        buf.push(self.function.to_u8());
        buf.push(len[0]);
        buf.push(len[1]);
        buf
    }

    /// Decodes the four-byte BVLC header from the front of `bytes`. Does
    /// not itself check `length` against `bytes.len()` — the top-level
    /// dispatcher does that once the whole frame is available, reporting
    /// `LengthInconsistent` rather than `TooShort` when they disagree.
    pub fn decode(bytes: &[u8]) -> Result<(BvlcHeader, usize)> {
        if bytes.len() < 4 {
            return Err(too_short("reading BVLC header", 4, bytes.len()));
        }
        if bytes[0] != BVLC_TYPE {
            return Err(BacnetError::Malformed(alloc_format(bytes[0])));
        }
        let function = BvlcFunction::from_u8(bytes[1]);
        let length = u16::from_be_bytes([bytes[2], bytes[3]]);
        Ok((
            BvlcHeader {
                bvlc_type: bytes[0],
                function,
                length,
            },
            4,
        ))
    }
}

#[cfg(feature = "std")]
fn alloc_format(found_type: u8) -> std::string::String {
    std::format!("expected BVLC type 0x{:02X}, found 0x{:02X}", BVLC_TYPE, found_type)
}

#[cfg(not(feature = "std"))]
fn alloc_format(found_type: u8) -> alloc::string::String {
    alloc::format!("expected BVLC type 0x{:02X}, found 0x{:02X}", BVLC_TYPE, found_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicast_round_trips() {
        let header = BvlcHeader::unicast(12);
        let encoded = header.encode();
        assert_eq!(encoded.len(), 4);
        let (decoded, consumed) = BvlcHeader::decode(&encoded).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded, header);
    }

    #[test]
    fn whois_scenario_header() {
        let bytes = [0x81, 0x0B, 0x00, 0x08];
        let (header, _) = BvlcHeader::decode(&bytes).unwrap();
        assert_eq!(header.function, BvlcFunction::OriginalBroadcastNpdu);
        assert_eq!(header.length, 8);
    }

    #[test]
    fn wrong_type_is_malformed() {
        let bytes = [0x82, 0x0B, 0x00, 0x08];
        let err = BvlcHeader::decode(&bytes).unwrap_err();
        assert!(matches!(err, BacnetError::Malformed(_)));
    }

    #[test]
    fn too_short_header() {
        assert!(BvlcHeader::decode(&[0x81, 0x0B]).is_err());
    }

    #[test]
    fn unknown_function_is_recognized_not_covered() {
        let bytes = [0x81, 0x05, 0x00, 0x06];
        let (header, _) = BvlcHeader::decode(&bytes).unwrap();
        assert!(!header.function.is_covered());
    }
}
