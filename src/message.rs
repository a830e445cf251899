//! Message: the three-header aggregate and the top-level decode dispatcher.
//!
//! A `Message` owns its BVLC, NPDU, and APDU headers directly — there is no
//! inheritance or embedding between layers, matching the layering this
//! crate's codecs already keep separate. [`Message::parse`] is the entry
//! point a caller hands a raw datagram to: it identifies which service a
//! buffer carries by peeking the PDU type and (for confirmed/unconfirmed
//! requests) the service choice byte, then fully decodes all three headers.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::app::{Apdu, PduType};
use crate::datalink::bip::{BvlcFunction, BvlcHeader};
use crate::encoding::ApduItem;
use crate::error::{BacnetError, Result};
use crate::network::Npdu;
use crate::service::{
    confirmed, unconfirmed, IAmRequest, ReadPropertyRequest, Value, WritePropertyRequest,
};

const MIN_FRAME_LEN: usize = 8;

/// A fully-decoded (or about-to-be-encoded) BACnet/IP frame: link header,
/// network header, and application payload, each owned independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub bvlc: BvlcHeader,
    pub npdu: Npdu,
    pub apdu: Apdu,
}

impl Message {
    /// Builds a message from already-constructed headers, computing the
    /// BVLC `length` field from the other two. The BVLC `length` is a
    /// derived attribute: it is recomputed here rather than trusted from
    /// whatever the caller set on `bvlc`.
    pub fn new(mut bvlc: BvlcHeader, npdu: Npdu, apdu: Apdu) -> Self {
        let total = BvlcHeader::encoded_len() + npdu.encoded_len() + apdu.encoded_len();
        bvlc.length = total as u16;
        Self { bvlc, npdu, apdu }
    }

    pub fn new_who_is(bvlc: BvlcHeader, npdu: Npdu) -> Self {
        let apdu = Apdu::new_unconfirmed(unconfirmed::WHO_IS, Vec::new());
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_i_am(
        bvlc: BvlcHeader,
        npdu: Npdu,
        device_instance: u32,
        max_apdu_len: u32,
        seg_support: u32,
        vendor_id: u32,
    ) -> Self {
        let iam = IAmRequest::new(device_instance, max_apdu_len, seg_support, vendor_id);
        let apdu = Apdu::new_unconfirmed(unconfirmed::I_AM, iam.to_objects());
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_read_property(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        object_type: u16,
        instance: u32,
        property_id: u32,
    ) -> Self {
        let req = ReadPropertyRequest::new(object_type, instance, property_id);
        let apdu = Apdu::new_confirmed(invoke_id, confirmed::READ_PROPERTY, req.to_objects());
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_read_property_multiple(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        objects: Vec<ApduItem>,
    ) -> Self {
        let apdu = Apdu::new_confirmed(invoke_id, confirmed::READ_PROPERTY_MULTIPLE, objects);
        Self::new(bvlc, npdu, apdu)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_write_property(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        object_type: u16,
        instance: u32,
        property_id: u32,
        value: Value,
        priority: Option<u8>,
    ) -> Self {
        let req = WritePropertyRequest::new(object_type, instance, property_id, value, priority);
        let apdu = Apdu::new_confirmed(invoke_id, confirmed::WRITE_PROPERTY, req.to_objects());
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_simple_ack(bvlc: BvlcHeader, npdu: Npdu, invoke_id: u8, service: u8) -> Self {
        let apdu = Apdu::new_ack(PduType::SimpleAck, invoke_id, service, Vec::new());
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_complex_ack(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        service: u8,
        objects: Vec<ApduItem>,
    ) -> Self {
        let apdu = Apdu::new_ack(PduType::ComplexAck, invoke_id, service, objects);
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_error(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        service: u8,
        objects: Vec<ApduItem>,
    ) -> Self {
        let apdu = Apdu::new_ack(PduType::Error, invoke_id, service, objects);
        Self::new(bvlc, npdu, apdu)
    }

    pub fn new_segment_ack(
        bvlc: BvlcHeader,
        npdu: Npdu,
        invoke_id: u8,
        service: u8,
        objects: Vec<ApduItem>,
    ) -> Self {
        let apdu = Apdu::new_ack(PduType::SegmentAck, invoke_id, service, objects);
        Self::new(bvlc, npdu, apdu)
    }

    pub fn encoded_len(&self) -> usize {
        BvlcHeader::encoded_len() + self.npdu.encoded_len() + self.apdu.encoded_len()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.bvlc.encode());
        self.npdu.encode_into(&mut buf);
        self.apdu.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Parses a raw BACnet/IP datagram into a [`Message`], dispatching on
    /// PDU type and (for confirmed/unconfirmed requests) service choice to
    /// confirm the frame shape is one this crate covers, then fully
    /// decoding all three headers.
    ///
    /// This mirrors a two-pass design: the dispatch key is read first from
    /// the raw bytes to select which combination of PDU type and service is
    /// expected, and then the full decode below re-derives the same headers
    /// from scratch. The second pass is not logically necessary once the
    /// dispatch key is known, but it is kept deliberately (matching the
    /// retrieved source this crate is grounded on) rather than threading the
    /// already-parsed BVLC/NPDU through the dispatch step.
    pub fn parse(bytes: &[u8]) -> Result<Message> {
        if bytes.len() < MIN_FRAME_LEN {
            return Err(BacnetError::TooShort {
                context: "parsing a BACnet/IP frame".into(),
                needed: MIN_FRAME_LEN,
                available: bytes.len(),
            });
        }

        let (bvlc, bvlc_len) = BvlcHeader::decode(bytes)?;
        if bvlc.length as usize != bytes.len() {
            log::warn!(
                "BVLC length {} disagrees with actual buffer length {}",
                bvlc.length,
                bytes.len()
            );
            return Err(BacnetError::LengthInconsistent {
                declared: bvlc.length as usize,
                actual: bytes.len(),
            });
        }
        if !bvlc.function.is_covered() {
            return Err(BacnetError::NotImplemented(format_unsupported_function(bvlc.function)));
        }

        let (npdu, npdu_len) = Npdu::decode(&bytes[bvlc_len..])?;
        let apdu_offset = bvlc_len + npdu_len;
        if apdu_offset >= bytes.len() {
            return Err(BacnetError::TooShort {
                context: "reading APDU type/flags byte".into(),
                needed: 1,
                available: 0,
            });
        }

        let pdu_type_nibble = bytes[apdu_offset] >> 4;
        let dispatch_supported = match pdu_type_nibble {
            t if t == PduType::UnconfirmedReq as u8 => {
                apdu_offset + 1 < bytes.len()
                    && matches!(bytes[apdu_offset + 1], unconfirmed::WHO_IS | unconfirmed::I_AM)
            }
            t if t == PduType::ConfirmedReq as u8 => {
                apdu_offset + 3 < bytes.len()
                    && matches!(
                        bytes[apdu_offset + 3],
                        confirmed::READ_PROPERTY | confirmed::READ_PROPERTY_MULTIPLE | confirmed::WRITE_PROPERTY
                    )
            }
            t if t == PduType::ComplexAck as u8
                || t == PduType::SimpleAck as u8
                || t == PduType::Error as u8
                || t == PduType::SegmentAck as u8 =>
            {
                true
            }
            _ => false,
        };
        if !dispatch_supported {
            return Err(BacnetError::NotImplemented(
                "PDU type / service choice combination is not one of the covered services".into(),
            ));
        }

        let (apdu, _apdu_len) = Apdu::decode(&bytes[apdu_offset..])?;

        Ok(Message { bvlc, npdu, apdu })
    }
}

#[cfg(feature = "std")]
fn format_unsupported_function(function: BvlcFunction) -> std::string::String {
    std::format!("BVLC function {:?} is not a decodable NPDU-carrying frame", function)
}

#[cfg(not(feature = "std"))]
fn format_unsupported_function(function: BvlcFunction) -> alloc::string::String {
    alloc::format!("BVLC function {:?} is not a decodable NPDU-carrying frame", function)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn who_is_round_trips() {
        let msg = Message::new_who_is(BvlcHeader::broadcast(0), Npdu::global_broadcast());
        let encoded = msg.encode().unwrap();
        assert_eq!(&encoded, &[0x81, 0x0B, 0x00, 0x08, 0x01, 0x20, 0xFF, 0xFF, 0x00, 0xFF, 0x10, 0x08]);
        let decoded = Message::parse(&encoded).unwrap();
        assert_eq!(decoded.apdu.pdu_type, PduType::UnconfirmedReq);
        assert_eq!(decoded.apdu.service, unconfirmed::WHO_IS);
    }

    #[test]
    fn i_am_device_321_round_trips() {
        let msg = Message::new_i_am(BvlcHeader::broadcast(0), Npdu::global_broadcast(), 321, 1024, 0, 1);
        let encoded = msg.encode().unwrap();
        let decoded = Message::parse(&encoded).unwrap();
        let decoded_iam = IAmRequest::from_objects(&decoded.apdu.objects).unwrap();
        assert_eq!(decoded_iam, IAmRequest::new(321, 1024, 0, 1));
    }

    #[test]
    fn read_property_round_trips_unicast() {
        let msg = Message::new_read_property(
            BvlcHeader::unicast(0),
            Npdu::new(),
            7,
            crate::object::ObjectType::AnalogOutput as u16,
            1,
            85,
        );
        let encoded = msg.encode().unwrap();
        let decoded = Message::parse(&encoded).unwrap();
        assert_eq!(decoded.apdu.invoke_id, 7);
        assert_eq!(decoded.apdu.service, confirmed::READ_PROPERTY);
        let decoded_req = ReadPropertyRequest::from_objects(&decoded.apdu.objects).unwrap();
        assert_eq!(decoded_req, ReadPropertyRequest::new(crate::object::ObjectType::AnalogOutput as u16, 1, 85));
    }

    #[test]
    fn length_field_backfilled_on_construction() {
        let msg = Message::new_who_is(BvlcHeader::broadcast(0), Npdu::global_broadcast());
        assert_eq!(msg.bvlc.length as usize, msg.encoded_len());
    }

    #[test]
    fn too_short_frame_is_rejected() {
        let err = Message::parse(&[0x81, 0x0A, 0x00, 0x06, 0x01, 0x00]).unwrap_err();
        assert!(matches!(err, BacnetError::TooShort { .. }));
    }

    #[test]
    fn length_mismatch_is_reported() {
        let mut bytes = Message::new_who_is(BvlcHeader::broadcast(0), Npdu::global_broadcast())
            .encode()
            .unwrap();
        bytes[3] = 0xFF;
        let err = Message::parse(&bytes).unwrap_err();
        assert!(matches!(err, BacnetError::LengthInconsistent { .. }));
    }

    #[test]
    fn uncovered_service_choice_is_not_implemented() {
        let apdu = Apdu::new_unconfirmed(0x7F, Vec::new());
        let msg = Message::new(BvlcHeader::broadcast(0), Npdu::global_broadcast(), apdu);
        let encoded = msg.encode().unwrap();
        let err = Message::parse(&encoded).unwrap_err();
        assert!(matches!(err, BacnetError::NotImplemented(_)));
    }

    #[test]
    fn write_property_constructor_matches_request() {
        let msg = Message::new_write_property(
            BvlcHeader::unicast(0),
            Npdu::new(),
            3,
            crate::object::ObjectType::AnalogOutput as u16,
            1,
            85,
            Value::Real(72.0),
            Some(8),
        );
        let encoded = msg.encode().unwrap();
        let decoded = Message::parse(&encoded).unwrap();
        let decoded_req = WritePropertyRequest::from_objects(&decoded.apdu.objects).unwrap();
        assert_eq!(
            decoded_req,
            WritePropertyRequest::new(
                crate::object::ObjectType::AnalogOutput as u16,
                1,
                85,
                Value::Real(72.0),
                Some(8),
            )
        );
    }
}
