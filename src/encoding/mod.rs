//! Tagged Object Codec
//!
//! This module implements the tag-length-value grammar that underlies every
//! BACnet APDU: a header byte packs a 4-bit tag number, a tag-class bit, and
//! a 4-bit length nibble, optionally followed by an extended-length byte and
//! then the payload itself. The same header shape also expresses the
//! "opening"/"closing" structural brackets used to delimit nested
//! constructs (e.g. the value slot of a `WriteProperty` request).
//!
//! # Overview
//!
//! - **Tag**: `tag_number` (0..15) plus `tag_class` (application or context)
//! - **Length**: 0..253 inline; 5 in the header nibble signals "read another
//!   byte for the real length"
//! - **Value**: the raw payload, further interpreted by the primitive
//!   decoders in this module (unsigned/signed integers, Real, Enumerated,
//!   ObjectIdentifier, character string, Null)
//!
//! # Examples
//!
//! ```rust
//! use bacnet_rs::encoding::{encode_application_unsigned, decode_application_unsigned};
//!
//! let object = encode_application_unsigned(42);
//! let mut buf = Vec::new();
//! object.encode_into(&mut buf).unwrap();
//!
//! let (value, consumed) = decode_application_unsigned(&buf).unwrap();
//! assert_eq!(value, 42);
//! assert_eq!(consumed, buf.len());
//! ```
//!
//! ```rust
//! use bacnet_rs::encoding::{Object, TagClass, decode_tagged_item, ApduItem};
//!
//! let obj = Object::new(TagClass::Application, 2, vec![0x2A]);
//! let mut buf = Vec::new();
//! obj.encode_into(&mut buf).unwrap();
//!
//! let (item, consumed) = decode_tagged_item(&buf).unwrap();
//! assert_eq!(consumed, 2);
//! match item {
//!     ApduItem::Object(o) => assert_eq!(o.data, vec![0x2A]),
//!     ApduItem::NamedTag(_) => panic!("expected a data object"),
//! }
//! ```

#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

use crate::error::{too_short, BacnetError, Result};

/// Whether a tag occupies the application number space (standard types) or
/// the context number space (service-local, position-identified slots).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Application,
    Context,
}

impl TagClass {
    fn bit(self) -> u8 {
        match self {
            TagClass::Application => 0,
            TagClass::Context => 1,
        }
    }

    fn from_bit(bit: u8) -> Self {
        if bit != 0 {
            TagClass::Context
        } else {
            TagClass::Application
        }
    }
}

/// Standard BACnet application tag numbers for the primitive types this
/// codec covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApplicationTag {
    Null = 0,
    Boolean = 1,
    UnsignedInt = 2,
    SignedInt = 3,
    Real = 4,
    Double = 5,
    OctetString = 6,
    CharacterString = 7,
    BitString = 8,
    Enumerated = 9,
    Date = 10,
    Time = 11,
    ObjectIdentifier = 12,
}

/// A data-bearing tagged value: header + raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub tag_number: u8,
    pub tag_class: TagClass,
    pub data: Vec<u8>,
}

impl Object {
    pub fn new(tag_class: TagClass, tag_number: u8, data: Vec<u8>) -> Self {
        Self {
            tag_number,
            tag_class,
            data,
        }
    }

    pub fn application(tag: ApplicationTag, data: Vec<u8>) -> Self {
        Self::new(TagClass::Application, tag as u8, data)
    }

    pub fn context(tag_number: u8, data: Vec<u8>) -> Self {
        Self::new(TagClass::Context, tag_number, data)
    }

    /// Number of bytes this object occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        1 + if self.data.len() >= 5 { 1 } else { 0 } + self.data.len()
    }

    /// Appends the wire encoding of this object to `buf`.
    ///
    /// Payloads longer than 253 bytes are outside the covered surface: the
    /// extended-length byte is a single `u8`, so there is no inline
    /// representation for them here. Encoding such an object fails with
    /// `Malformed` rather than writing a length byte that disagrees with
    /// the bytes actually appended.
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        let len = self.data.len();
        if len > 253 {
            return Err(BacnetError::Malformed(format!(
                "object payload of {} bytes exceeds the 253-byte covered length limit",
                len
            )));
        }
        let length_nibble: u8 = if len < 5 { len as u8 } else { 5 };
        let header = (self.tag_number << 4) | (self.tag_class.bit() << 3) | length_nibble;
        buf.push(header);
        if length_nibble == 5 {
            buf.push(len as u8);
        }
        buf.extend_from_slice(&self.data);
        Ok(())
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }
}

/// Which bracket a [`NamedTag`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedTagKind {
    Opening,
    Closing,
}

/// A structural bracket (opening/closing context tag) carrying no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedTag {
    pub tag_number: u8,
    pub kind: NamedTagKind,
}

impl NamedTag {
    pub fn opening(tag_number: u8) -> Self {
        Self {
            tag_number,
            kind: NamedTagKind::Opening,
        }
    }

    pub fn closing(tag_number: u8) -> Self {
        Self {
            tag_number,
            kind: NamedTagKind::Closing,
        }
    }

    pub fn encoded_len(&self) -> usize {
        1
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        let length_nibble: u8 = match self.kind {
            NamedTagKind::Opening => 6,
            NamedTagKind::Closing => 7,
        };
        buf.push((self.tag_number << 4) | 0x08 | length_nibble);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1);
        self.encode_into(&mut buf);
        buf
    }
}

/// The closed sum of everything that can appear in an APDU object stream:
/// either a data-bearing [`Object`] or a structural [`NamedTag`] bracket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApduItem {
    Object(Object),
    NamedTag(NamedTag),
}

impl ApduItem {
    pub fn encoded_len(&self) -> usize {
        match self {
            ApduItem::Object(o) => o.encoded_len(),
            ApduItem::NamedTag(n) => n.encoded_len(),
        }
    }

    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            ApduItem::Object(o) => o.encode_into(buf),
            ApduItem::NamedTag(n) => {
                n.encode_into(buf);
                Ok(())
            }
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut buf)?;
        Ok(buf)
    }

    /// Unwraps the item as a data object, or fails with `WrongPayload`.
    pub fn as_object(&self) -> Result<&Object> {
        match self {
            ApduItem::Object(o) => Ok(o),
            ApduItem::NamedTag(_) => Err(BacnetError::WrongPayload(
                "expected a data object, found a named (opening/closing) tag".into(),
            )),
        }
    }

    pub fn as_named_tag(&self) -> Result<&NamedTag> {
        match self {
            ApduItem::NamedTag(n) => Ok(n),
            ApduItem::Object(_) => Err(BacnetError::WrongPayload(
                "expected an opening/closing tag, found a data object".into(),
            )),
        }
    }
}

/// Decodes a single tagged item (object or named tag) from the front of
/// `bytes`, returning it along with the number of bytes consumed.
pub fn decode_tagged_item(bytes: &[u8]) -> Result<(ApduItem, usize)> {
    if bytes.is_empty() {
        return Err(too_short("reading tagged item header", 1, 0));
    }

    let header = bytes[0];
    let tag_number = header >> 4;
    let class_bit = (header & 0x08) >> 3;
    let length_nibble = header & 0x07;
    let tag_class = TagClass::from_bit(class_bit);

    if tag_class == TagClass::Context && (length_nibble == 6 || length_nibble == 7) {
        let kind = if length_nibble == 6 {
            NamedTagKind::Opening
        } else {
            NamedTagKind::Closing
        };
        return Ok((
            ApduItem::NamedTag(NamedTag { tag_number, kind }),
            1,
        ));
    }

    let (length, header_len): (usize, usize) = if length_nibble == 5 {
        if bytes.len() < 2 {
            return Err(too_short("reading extended-length byte", 2, bytes.len()));
        }
        (bytes[1] as usize, 2)
    } else {
        (length_nibble as usize, 1)
    };

    if bytes.len() < header_len + length {
        return Err(too_short(
            "reading tagged item payload",
            header_len + length,
            bytes.len(),
        ));
    }
    if length_nibble == 5 && length < 5 {
        return Err(BacnetError::Malformed(
            "extended-length byte encodes a length under 5, which should use the inline nibble".into(),
        ));
    }

    let data = bytes[header_len..header_len + length].to_vec();
    Ok((
        ApduItem::Object(Object {
            tag_number,
            tag_class,
            data,
        }),
        header_len + length,
    ))
}

// ---------------------------------------------------------------------
// Typed primitive codecs
// ---------------------------------------------------------------------

fn widen_unsigned(data: &[u8]) -> Result<u32> {
    match data.len() {
        1 => Ok(data[0] as u32),
        2 => Ok(u16::from_be_bytes([data[0], data[1]]) as u32),
        3 => Ok(((data[0] as u32) << 16) | (u16::from_be_bytes([data[1], data[2]]) as u32)),
        4 => Ok(u32::from_be_bytes([data[0], data[1], data[2], data[3]])),
        other => Err(BacnetError::NotImplemented(format!(
            "unsupported integer payload width {} bytes",
            other
        ))),
    }
}

fn sign_extend(data: &[u8]) -> Result<i32> {
    let width = data.len();
    let unsigned = widen_unsigned(data)?;
    if width == 4 {
        return Ok(unsigned as i32);
    }
    let sign_bit = 1u32 << (width * 8 - 1);
    if unsigned & sign_bit != 0 {
        let extend_mask = !0u32 << (width * 8);
        Ok((unsigned | extend_mask) as i32)
    } else {
        Ok(unsigned as i32)
    }
}

fn minimal_width_bytes(value: u32) -> Vec<u8> {
    if value <= 0xFF {
        vec![value as u8]
    } else if value <= 0xFFFF {
        (value as u16).to_be_bytes().to_vec()
    } else if value <= 0x00FF_FFFF {
        let b = value.to_be_bytes();
        vec![b[1], b[2], b[3]]
    } else {
        value.to_be_bytes().to_vec()
    }
}

/// Encodes `value` as an application-tagged Unsigned Integer, using the
/// narrowest width that represents it (1/2/3/4 bytes).
pub fn encode_application_unsigned(value: u32) -> Object {
    Object::application(ApplicationTag::UnsignedInt, minimal_width_bytes(value))
}

/// Encodes `value` as a context-tagged Unsigned Integer under `tag_number`.
pub fn encode_context_unsigned(tag_number: u8, value: u32) -> Object {
    Object::context(tag_number, minimal_width_bytes(value))
}

/// Decodes an application-tagged Unsigned Integer from the front of `bytes`.
pub fn decode_application_unsigned(bytes: &[u8]) -> Result<(u32, usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::UnsignedInt as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Unsigned Integer".into(),
            found_tag: obj.tag_number,
        });
    }
    Ok((widen_unsigned(&obj.data)?, consumed))
}

/// Interprets an already-extracted [`Object`] as an Unsigned Integer,
/// regardless of tag class (used for context-tagged slots whose number is
/// position-dependent, like WriteProperty's priority field).
pub fn decode_unsigned_value(obj: &Object) -> Result<u32> {
    widen_unsigned(&obj.data)
}

/// Encodes `value` as an application-tagged Signed Integer.
pub fn encode_application_signed(value: i32) -> Object {
    let data = if (-128..=127).contains(&value) {
        vec![value as i8 as u8]
    } else if (-32768..=32767).contains(&value) {
        (value as i16).to_be_bytes().to_vec()
    } else if (-8_388_608..=8_388_607).contains(&value) {
        let b = (value as i32).to_be_bytes();
        vec![b[1], b[2], b[3]]
    } else {
        value.to_be_bytes().to_vec()
    };
    Object::application(ApplicationTag::SignedInt, data)
}

/// Decodes an application-tagged Signed Integer.
pub fn decode_application_signed(bytes: &[u8]) -> Result<(i32, usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::SignedInt as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Signed Integer".into(),
            found_tag: obj.tag_number,
        });
    }
    Ok((sign_extend(&obj.data)?, consumed))
}

/// Interprets an already-extracted [`Object`] as a Signed Integer, regardless
/// of tag class.
pub fn decode_signed_value(obj: &Object) -> Result<i32> {
    sign_extend(&obj.data)
}

/// Encodes `value` as an application-tagged Real (IEEE-754 single precision).
pub fn encode_application_real(value: f32) -> Object {
    Object::application(ApplicationTag::Real, value.to_be_bytes().to_vec())
}

/// Decodes an application-tagged Real.
pub fn decode_application_real(bytes: &[u8]) -> Result<(f32, usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::Real as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Real".into(),
            found_tag: obj.tag_number,
        });
    }
    decode_real_value(obj)
}

/// Interprets an already-extracted [`Object`] as a Real, regardless of tag
/// class.
pub fn decode_real_value(obj: &Object) -> Result<(f32, usize)> {
    if obj.data.len() != 4 {
        return Err(BacnetError::Malformed(format!(
            "Real payload must be 4 bytes, got {}",
            obj.data.len()
        )));
    }
    let bits = u32::from_be_bytes([obj.data[0], obj.data[1], obj.data[2], obj.data[3]]);
    Ok((f32::from_bits(bits), obj.encoded_len()))
}

/// Encodes `value` as an application-tagged Enumerated value.
pub fn encode_application_enumerated(value: u32) -> Object {
    Object::application(ApplicationTag::Enumerated, minimal_width_bytes(value))
}

/// Decodes an application-tagged Enumerated value.
pub fn decode_application_enumerated(bytes: &[u8]) -> Result<(u32, usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::Enumerated as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Enumerated".into(),
            found_tag: obj.tag_number,
        });
    }
    Ok((widen_unsigned(&obj.data)?, consumed))
}

/// Interprets an already-extracted [`Object`] as an Enumerated value,
/// regardless of tag class.
pub fn decode_enumerated_value(obj: &Object) -> Result<u32> {
    widen_unsigned(&obj.data)
}

/// Encodes the Null primitive (zero-length application tag 0).
pub fn encode_application_null() -> Object {
    Object::application(ApplicationTag::Null, Vec::new())
}

/// Decodes a Null primitive. Rejects anything whose tag number is not
/// `Null` or whose payload is non-empty — the source this crate is derived
/// from compares against the `Real` tag number here, which is a bug this
/// implementation does not reproduce (see `DESIGN.md`).
pub fn decode_application_null(bytes: &[u8]) -> Result<((), usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::Null as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Null".into(),
            found_tag: obj.tag_number,
        });
    }
    if !obj.data.is_empty() {
        return Err(BacnetError::Malformed("Null payload must be empty".into()));
    }
    Ok(((), consumed))
}

/// Encodes a raw character-string payload (opaque bytes; no character-set
/// negotiation at this layer).
pub fn encode_application_character_string(bytes: &[u8]) -> Object {
    Object::application(ApplicationTag::CharacterString, bytes.to_vec())
}

/// Decodes a character-string object's raw payload bytes.
pub fn decode_application_character_string(bytes: &[u8]) -> Result<(Vec<u8>, usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class != TagClass::Application || obj.tag_number != ApplicationTag::CharacterString as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application Character String".into(),
            found_tag: obj.tag_number,
        });
    }
    Ok((obj.data.clone(), consumed))
}

/// Packs `(object_type, instance)` into the 4-byte BACnet ObjectIdentifier
/// wire representation: `object_type` in the high 10 bits, `instance` in
/// the low 22 bits.
pub fn pack_object_identifier(object_type: u16, instance: u32) -> [u8; 4] {
    let packed = ((object_type as u32) << 22) | (instance & 0x3F_FFFF);
    packed.to_be_bytes()
}

/// Reverses [`pack_object_identifier`].
pub fn unpack_object_identifier(data: &[u8]) -> Result<(u16, u32)> {
    if data.len() != 4 {
        return Err(BacnetError::Malformed(format!(
            "ObjectIdentifier payload must be 4 bytes, got {}",
            data.len()
        )));
    }
    let packed = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let object_type = (packed >> 22) as u16;
    let instance = packed & 0x3F_FFFF;
    Ok((object_type, instance))
}

/// Encodes an application-tagged ObjectIdentifier.
pub fn encode_application_object_identifier(object_type: u16, instance: u32) -> Object {
    Object::application(
        ApplicationTag::ObjectIdentifier,
        pack_object_identifier(object_type, instance).to_vec(),
    )
}

/// Decodes an application-tagged ObjectIdentifier.
pub fn decode_application_object_identifier(bytes: &[u8]) -> Result<((u16, u32), usize)> {
    let (item, consumed) = decode_tagged_item(bytes)?;
    let obj = item.as_object()?;
    if obj.tag_class == TagClass::Application && obj.tag_number != ApplicationTag::ObjectIdentifier as u8 {
        return Err(BacnetError::WrongStructure {
            expected: "application ObjectIdentifier".into(),
            found_tag: obj.tag_number,
        });
    }
    Ok((unpack_object_identifier(&obj.data)?, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_grammar_length_shape() {
        for len in [0usize, 1, 2, 3, 4, 5, 6, 253] {
            let obj = Object::application(ApplicationTag::OctetString, vec![0xAB; len]);
            let expected = 1 + if len >= 5 { 1 } else { 0 } + len;
            assert_eq!(obj.encoded_len(), expected);
            let encoded = obj.encode().unwrap();
            assert_eq!(encoded.len(), expected);

            let (item, consumed) = decode_tagged_item(&encoded).unwrap();
            assert_eq!(consumed, expected);
            let decoded = item.as_object().unwrap();
            assert_eq!(decoded.data.len(), len);
        }
    }

    #[test]
    fn object_payload_over_253_bytes_is_rejected() {
        let obj = Object::application(ApplicationTag::OctetString, vec![0xAB; 254]);
        let err = obj.encode().unwrap_err();
        assert!(matches!(err, BacnetError::Malformed(_)));

        let mut buf = Vec::new();
        let err = obj.encode_into(&mut buf).unwrap_err();
        assert!(matches!(err, BacnetError::Malformed(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn named_tags_are_one_byte() {
        let opening = NamedTag::opening(3);
        let closing = NamedTag::closing(3);
        assert_eq!(opening.encode(), vec![0x3E]);
        assert_eq!(closing.encode(), vec![0x3F]);

        let (item, consumed) = decode_tagged_item(&opening.encode()).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(item.as_named_tag().unwrap().kind, NamedTagKind::Opening);
    }

    #[test]
    fn unsigned_round_trip_widths() {
        for value in [0u32, 1, 255, 256, 65535, 65536, 0x00FF_FFFF, 0xFFFF_FFFF] {
            let obj = encode_application_unsigned(value);
            let encoded = obj.encode().unwrap();
            let (decoded, consumed) = decode_application_unsigned(&encoded).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn signed_sign_extends() {
        let obj = encode_application_signed(-1);
        assert_eq!(obj.data, vec![0xFF]);
        let (decoded, _) = decode_application_signed(&obj.encode().unwrap()).unwrap();
        assert_eq!(decoded, -1);

        let obj = encode_application_signed(-300);
        let (decoded, _) = decode_application_signed(&obj.encode().unwrap()).unwrap();
        assert_eq!(decoded, -300);
    }

    #[test]
    fn real_round_trips() {
        let obj = encode_application_real(72.0);
        assert_eq!(obj.data, 0x42900000u32.to_be_bytes().to_vec());
        let (decoded, _) = decode_application_real(&obj.encode().unwrap()).unwrap();
        assert_eq!(decoded, 72.0);
    }

    #[test]
    fn null_rejects_wrong_tag() {
        let real = encode_application_real(1.0);
        let err = decode_application_null(&real.encode().unwrap()).unwrap_err();
        assert!(matches!(err, BacnetError::WrongStructure { .. }));
    }

    #[test]
    fn null_accepts_empty_payload() {
        let obj = encode_application_null();
        let (_, consumed) = decode_application_null(&obj.encode().unwrap()).unwrap();
        assert_eq!(consumed, 1);
    }

    #[test]
    fn object_identifier_packs_type_and_instance() {
        let bytes = pack_object_identifier(8, 321);
        let (object_type, instance) = unpack_object_identifier(&bytes).unwrap();
        assert_eq!(object_type, 8);
        assert_eq!(instance, 321);
    }

    #[test]
    fn object_identifier_iam_scenario() {
        // IAm of device 321: ObjectIdentifier context=app, tag=12, len=4
        let obj = encode_application_object_identifier(8, 321);
        let encoded = obj.encode().unwrap();
        assert_eq!(&encoded[..1], &[0xC4]);
        assert_eq!(&encoded[1..], &[0x00, 0x01, 0x41, 0x01]);
    }

    #[test]
    fn too_short_on_truncated_header() {
        let err = decode_tagged_item(&[]).unwrap_err();
        assert!(matches!(err, BacnetError::TooShort { .. }));
    }

    #[test]
    fn too_short_on_truncated_payload() {
        // header claims length 4 but only 2 bytes follow
        let err = decode_tagged_item(&[0x24, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, BacnetError::TooShort { .. }));
    }

    #[cfg(feature = "std")]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unsigned_round_trips_for_any_u32(value: u32) {
                let obj = encode_application_unsigned(value);
                let (decoded, consumed) = decode_application_unsigned(&obj.encode().unwrap()).unwrap();
                prop_assert_eq!(decoded, value);
                prop_assert_eq!(consumed, obj.encoded_len());
            }

            #[test]
            fn signed_round_trips_for_any_i32(value: i32) {
                let obj = encode_application_signed(value);
                let (decoded, _) = decode_application_signed(&obj.encode().unwrap()).unwrap();
                prop_assert_eq!(decoded, value);
            }

            #[test]
            fn real_round_trips_for_any_f32_bit_pattern(bits: u32) {
                let value = f32::from_bits(bits);
                let obj = encode_application_real(value);
                let (decoded, _) = decode_application_real(&obj.encode().unwrap()).unwrap();
                prop_assert_eq!(decoded.to_bits(), value.to_bits());
            }

            #[test]
            fn object_identifier_round_trips(object_type: u16, instance in 0u32..=0x3F_FFFF) {
                let packed = pack_object_identifier(object_type & 0x03FF, instance);
                let (decoded_type, decoded_instance) = unpack_object_identifier(&packed).unwrap();
                prop_assert_eq!(decoded_type, object_type & 0x03FF);
                prop_assert_eq!(decoded_instance, instance);
            }

            #[test]
            fn object_grammar_length_shape_for_any_payload(data: Vec<u8>) {
                let data = if data.len() > 253 { data[..253].to_vec() } else { data };
                let obj = Object::application(ApplicationTag::OctetString, data.clone());
                let encoded = obj.encode().unwrap();
                let (item, consumed) = decode_tagged_item(&encoded).unwrap();
                prop_assert_eq!(consumed, encoded.len());
                prop_assert_eq!(&item.as_object().unwrap().data, &data);
            }

            #[test]
            fn oversized_payload_is_always_rejected(extra in 0usize..512) {
                let data = vec![0xABu8; 254 + extra];
                let obj = Object::application(ApplicationTag::OctetString, data);
                prop_assert!(obj.encode().is_err());
            }
        }
    }
}
