//! APDU Codec
//!
//! The Application Protocol Data Unit carries a PDU-type-dependent header
//! followed by a stream of tagged objects. The header shape — which extra
//! fields follow the type/flags byte, and therefore how many bytes the
//! object stream starts at — depends entirely on `pdu_type`:
//!
//! | pdu_type | Extra header fields | Header length |
//! |---|---|---|
//! | ConfirmedReq (0) | max_segs/max_size, invoke_id, service | 4 |
//! | UnconfirmedReq (1) | service | 2 |
//! | SimpleAck (2) | invoke_id, service | 3 |
//! | ComplexAck (3) | invoke_id, service | 3 |
//! | SegmentAck (4) | invoke_id, service | 3 |
//! | Error (5) | invoke_id, service | 3 |
//!
//! # Examples
//!
//! ```rust
//! use bacnet_rs::app::{Apdu, PduType};
//! use bacnet_rs::encoding::{encode_application_unsigned, ApduItem};
//!
//! let apdu = Apdu::new_unconfirmed(8, vec![]);
//! let encoded = apdu.encode().unwrap();
//! let (decoded, consumed) = Apdu::decode(&encoded).unwrap();
//! assert_eq!(consumed, encoded.len());
//! assert_eq!(decoded.pdu_type, PduType::UnconfirmedReq);
//! assert_eq!(decoded.service, 8);
//! ```

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::encoding::{decode_tagged_item, ApduItem};
use crate::error::{too_short, BacnetError, Result};

/// The 4-bit PDU type discriminator at the top of every APDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    ConfirmedReq = 0,
    UnconfirmedReq = 1,
    SimpleAck = 2,
    ComplexAck = 3,
    SegmentAck = 4,
    Error = 5,
}

impl PduType {
    /// Header length in bytes, including the leading type/flags byte.
    pub fn header_len(self) -> usize {
        match self {
            PduType::ConfirmedReq => 4,
            PduType::UnconfirmedReq => 2,
            PduType::SimpleAck | PduType::ComplexAck | PduType::SegmentAck | PduType::Error => 3,
        }
    }
}

impl core::convert::TryFrom<u8> for PduType {
    type Error = BacnetError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PduType::ConfirmedReq),
            1 => Ok(PduType::UnconfirmedReq),
            2 => Ok(PduType::SimpleAck),
            3 => Ok(PduType::ComplexAck),
            4 => Ok(PduType::SegmentAck),
            5 => Ok(PduType::Error),
            other => Err(BacnetError::NotImplemented(alloc_format_pdu(other))),
        }
    }
}

#[cfg(feature = "std")]
fn alloc_format_pdu(value: u8) -> std::string::String {
    std::format!("unknown PDU type {}", value)
}

#[cfg(not(feature = "std"))]
fn alloc_format_pdu(value: u8) -> alloc::string::String {
    alloc::format!("unknown PDU type {}", value)
}

/// Application Protocol Data Unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Apdu {
    pub pdu_type: PduType,
    /// Low 3 bits of the first byte; semantics depend on `pdu_type` (see
    /// [`Apdu::set_flags`] for the ConfirmedReq/SegmentAck usage).
    pub flags: u8,
    pub max_segs: u8,
    pub max_size: u8,
    pub invoke_id: u8,
    pub service: u8,
    pub objects: Vec<ApduItem>,
}

impl Apdu {
    pub fn new_confirmed(invoke_id: u8, service: u8, objects: Vec<ApduItem>) -> Self {
        Self {
            pdu_type: PduType::ConfirmedReq,
            flags: 0,
            max_segs: 0,
            max_size: 0,
            invoke_id,
            service,
            objects,
        }
    }

    pub fn new_unconfirmed(service: u8, objects: Vec<ApduItem>) -> Self {
        Self {
            pdu_type: PduType::UnconfirmedReq,
            flags: 0,
            max_segs: 0,
            max_size: 0,
            invoke_id: 0,
            service,
            objects,
        }
    }

    pub fn new_ack(pdu_type: PduType, invoke_id: u8, service: u8, objects: Vec<ApduItem>) -> Self {
        Self {
            pdu_type,
            flags: 0,
            max_segs: 0,
            max_size: 0,
            invoke_id,
            service,
            objects,
        }
    }

    /// Packs bits 1/2/3 of the flags nibble: `segmented_ack_required`,
    /// `more_follows`, `segmented_request`.
    pub fn set_flags(&mut self, segmented_ack_required: bool, more_follows: bool, segmented_request: bool) {
        self.flags = (segmented_ack_required as u8) << 1
            | (more_follows as u8) << 2
            | (segmented_request as u8) << 3;
    }

    fn header_bytes(&self) -> Vec<u8> {
        let mut header = Vec::with_capacity(self.pdu_type.header_len());
        header.push(((self.pdu_type as u8) << 4) | (self.flags & 0x07));
        match self.pdu_type {
            PduType::ConfirmedReq => {
                header.push(((self.max_segs & 0x07) << 4) | (self.max_size & 0x0F));
                header.push(self.invoke_id);
                header.push(self.service);
            }
            PduType::UnconfirmedReq => {
                header.push(self.service);
            }
            PduType::SimpleAck | PduType::ComplexAck | PduType::SegmentAck | PduType::Error => {
                header.push(self.invoke_id);
                header.push(self.service);
            }
        }
        header
    }

    pub fn encoded_len(&self) -> usize {
        self.pdu_type.header_len() + self.objects.iter().map(ApduItem::encoded_len).sum::<usize>()
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(&self.header_bytes());
        for object in &self.objects {
            object.encode_into(buf)?;
        }
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Decodes an APDU from the front of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<(Apdu, usize)> {
        if bytes.is_empty() {
            return Err(too_short("reading APDU type/flags byte", 1, 0));
        }
        let pdu_type = core::convert::TryFrom::try_from(bytes[0] >> 4)?;
        let flags = bytes[0] & 0x07;

        let header_len: usize = match pdu_type {
            PduType::ConfirmedReq => 4,
            PduType::UnconfirmedReq => 2,
            PduType::SimpleAck | PduType::ComplexAck | PduType::SegmentAck | PduType::Error => 3,
        };
        if bytes.len() < header_len {
            return Err(too_short("reading APDU header", header_len, bytes.len()));
        }

        let (max_segs, max_size, invoke_id, service) = match pdu_type {
            PduType::ConfirmedReq => (
                (bytes[1] >> 4) & 0x07,
                bytes[1] & 0x0F,
                bytes[2],
                bytes[3],
            ),
            PduType::UnconfirmedReq => (0, 0, 0, bytes[1]),
            PduType::SimpleAck | PduType::ComplexAck | PduType::SegmentAck | PduType::Error => {
                (0, 0, bytes[1], bytes[2])
            }
        };

        let mut offset = header_len;
        let mut objects = Vec::new();
        while offset < bytes.len() {
            let (item, consumed) = decode_tagged_item(&bytes[offset..])?;
            objects.push(item);
            offset += consumed;
        }

        Ok((
            Apdu {
                pdu_type,
                flags,
                max_segs,
                max_size,
                invoke_id,
                service,
                objects,
            },
            offset,
        ))
    }
}
