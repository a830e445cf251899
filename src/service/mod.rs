//! Service Frames
//!
//! Typed views over an APDU's object list for the covered services:
//! `Who-Is`, `I-Am`, `ReadProperty`, `ReadPropertyMultiple`, `WriteProperty`,
//! and the Simple/Complex/Segment/Error acks. Each request/response type
//! knows how to build its own object list (`to_objects`) and how to project
//! an object list back into named fields (`from_objects`); the top-level
//! dispatcher in [`crate::message`] is what actually drives an APDU through
//! these.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::encoding::{
    decode_enumerated_value, decode_real_value, decode_signed_value, decode_unsigned_value,
    encode_application_enumerated, encode_application_object_identifier, encode_application_real,
    encode_application_signed, encode_application_unsigned, encode_context_unsigned, ApduItem,
    ApplicationTag, NamedTagKind, Object, TagClass,
};
use crate::error::{BacnetError, Result};

/// Unconfirmed service choice codes this crate builds or recognizes.
pub mod unconfirmed {
    pub const WHO_IS: u8 = 8;
    pub const I_AM: u8 = 0;
}

/// Confirmed service choice codes this crate builds or recognizes.
pub mod confirmed {
    pub const READ_PROPERTY: u8 = 0x0C;
    pub const READ_PROPERTY_MULTIPLE: u8 = 0x0E;
    pub const WRITE_PROPERTY: u8 = 0x0F;
}

fn context_object_identifier(tag_number: u8, object_type: u16, instance: u32) -> Object {
    Object::context(tag_number, crate::encoding::pack_object_identifier(object_type, instance).to_vec())
}

fn decode_context_object_identifier(obj: &Object, tag_number: u8) -> Result<(u16, u32)> {
    if obj.tag_class != TagClass::Context || obj.tag_number != tag_number {
        return Err(BacnetError::WrongStructure {
            expected: alloc_fmt_context("ObjectIdentifier", tag_number),
            found_tag: obj.tag_number,
        });
    }
    crate::encoding::unpack_object_identifier(&obj.data)
}

fn decode_context_unsigned(obj: &Object, tag_number: u8) -> Result<u32> {
    if obj.tag_class != TagClass::Context || obj.tag_number != tag_number {
        return Err(BacnetError::WrongStructure {
            expected: alloc_fmt_context("Unsigned Integer", tag_number),
            found_tag: obj.tag_number,
        });
    }
    decode_unsigned_value(obj)
}

#[cfg(feature = "std")]
fn alloc_fmt_context(kind: &str, tag_number: u8) -> std::string::String {
    std::format!("context-tagged {} at tag {}", kind, tag_number)
}

#[cfg(not(feature = "std"))]
fn alloc_fmt_context(kind: &str, tag_number: u8) -> alloc::string::String {
    alloc::format!("context-tagged {} at tag {}", kind, tag_number)
}

/// `Who-Is`: no body objects in the covered surface (device-range-limited
/// Who-Is is not built).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WhoIsRequest;

impl WhoIsRequest {
    pub fn to_objects(self) -> Vec<ApduItem> {
        Vec::new()
    }

    pub fn from_objects(_objects: &[ApduItem]) -> Result<Self> {
        Ok(WhoIsRequest)
    }
}

/// `I-Am`: device identity broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IAmRequest {
    pub device_instance: u32,
    pub max_apdu_length: u32,
    pub segmentation_supported: u32,
    pub vendor_id: u32,
}

impl IAmRequest {
    pub fn new(device_instance: u32, max_apdu_length: u32, segmentation_supported: u32, vendor_id: u32) -> Self {
        Self {
            device_instance,
            max_apdu_length,
            segmentation_supported,
            vendor_id,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        vec![
            ApduItem::Object(encode_application_object_identifier(
                crate::object::ObjectType::Device as u16,
                self.device_instance,
            )),
            ApduItem::Object(encode_application_unsigned(self.max_apdu_length)),
            ApduItem::Object(encode_application_enumerated(self.segmentation_supported)),
            ApduItem::Object(encode_application_unsigned(self.vendor_id)),
        ]
    }

    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() != 4 {
            return Err(BacnetError::WrongObjectCount {
                expected: 4,
                found: objects.len(),
            });
        }
        let device_obj = objects[0].as_object()?;
        let (_, device_instance) = crate::encoding::unpack_object_identifier(&device_obj.data)?;
        let max_apdu_length = decode_unsigned_value(objects[1].as_object()?)?;
        let segmentation_supported = decode_unsigned_value(objects[2].as_object()?)?;
        let vendor_id = decode_unsigned_value(objects[3].as_object()?)?;
        Ok(Self {
            device_instance,
            max_apdu_length,
            segmentation_supported,
            vendor_id,
        })
    }
}

/// `ReadProperty` request: object and property to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPropertyRequest {
    pub object_type: u16,
    pub instance: u32,
    pub property_id: u32,
}

impl ReadPropertyRequest {
    pub fn new(object_type: u16, instance: u32, property_id: u32) -> Self {
        Self {
            object_type,
            instance,
            property_id,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        vec![
            ApduItem::Object(context_object_identifier(0, self.object_type, self.instance)),
            ApduItem::Object(encode_context_unsigned(1, self.property_id)),
        ]
    }

    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() != 2 {
            return Err(BacnetError::WrongObjectCount {
                expected: 2,
                found: objects.len(),
            });
        }
        let (object_type, instance) = decode_context_object_identifier(objects[0].as_object()?, 0)?;
        let property_id = decode_context_unsigned(objects[1].as_object()?, 1)?;
        Ok(Self {
            object_type,
            instance,
            property_id,
        })
    }
}

/// `ReadPropertyMultiple` request: one object, a bracketed list of property
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadPropertyMultipleRequest {
    pub object_type: u16,
    pub instance: u32,
    pub property_ids: Vec<u32>,
}

impl ReadPropertyMultipleRequest {
    pub fn new(object_type: u16, instance: u32, property_ids: Vec<u32>) -> Self {
        Self {
            object_type,
            instance,
            property_ids,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        let mut objects = vec![
            ApduItem::Object(context_object_identifier(0, self.object_type, self.instance)),
            ApduItem::NamedTag(crate::encoding::NamedTag::opening(1)),
        ];
        for property_id in &self.property_ids {
            objects.push(ApduItem::Object(encode_context_unsigned(0, *property_id)));
        }
        objects.push(ApduItem::NamedTag(crate::encoding::NamedTag::closing(1)));
        objects
    }

    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() < 3 {
            return Err(BacnetError::WrongObjectCount {
                expected: 3,
                found: objects.len(),
            });
        }
        let (object_type, instance) = decode_context_object_identifier(objects[0].as_object()?, 0)?;
        let opening = objects[1].as_named_tag()?;
        if opening.kind != NamedTagKind::Opening || opening.tag_number != 1 {
            return Err(BacnetError::Malformed(
                "expected opening tag 1 after object identifier".into(),
            ));
        }
        let mut property_ids = Vec::new();
        let mut i = 2;
        loop {
            if i >= objects.len() {
                return Err(BacnetError::Malformed("unbalanced opening tag 1".into()));
            }
            if let Ok(closing) = objects[i].as_named_tag() {
                if closing.kind == NamedTagKind::Closing && closing.tag_number == 1 {
                    break;
                }
            }
            property_ids.push(decode_unsigned_value(objects[i].as_object()?)?);
            i += 1;
        }
        Ok(Self {
            object_type,
            instance,
            property_ids,
        })
    }
}

/// A closed sum of the application types a property value can carry in the
/// covered surface. Decoders produce the variant matching the application
/// tag number encountered; encoders pick the variant the caller chose.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Real(f32),
    UnsignedInt(u32),
    SignedInt(i32),
    Enumerated(u32),
    String(Vec<u8>),
}

impl Value {
    pub fn to_object(&self) -> Object {
        match self {
            Value::Null => crate::encoding::encode_application_null(),
            Value::Real(v) => encode_application_real(*v),
            Value::UnsignedInt(v) => encode_application_unsigned(*v),
            Value::SignedInt(v) => encode_application_signed(*v),
            Value::Enumerated(v) => encode_application_enumerated(*v),
            Value::String(bytes) => crate::encoding::encode_application_character_string(bytes),
        }
    }

    pub fn from_object(obj: &Object) -> Result<Self> {
        if obj.tag_class != TagClass::Application {
            return Err(BacnetError::WrongStructure {
                expected: "application-tagged value".into(),
                found_tag: obj.tag_number,
            });
        }
        if obj.tag_number == ApplicationTag::Null as u8 {
            if !obj.data.is_empty() {
                return Err(BacnetError::Malformed("Null payload must be empty".into()));
            }
            Ok(Value::Null)
        } else if obj.tag_number == ApplicationTag::Real as u8 {
            Ok(Value::Real(decode_real_value(obj)?.0))
        } else if obj.tag_number == ApplicationTag::UnsignedInt as u8 {
            Ok(Value::UnsignedInt(decode_unsigned_value(obj)?))
        } else if obj.tag_number == ApplicationTag::SignedInt as u8 {
            Ok(Value::SignedInt(decode_signed_value(obj)?))
        } else if obj.tag_number == ApplicationTag::Enumerated as u8 {
            Ok(Value::Enumerated(decode_unsigned_value(obj)?))
        } else if obj.tag_number == ApplicationTag::CharacterString as u8 {
            Ok(Value::String(obj.data.clone()))
        } else {
            Err(BacnetError::InvalidObjectType(alloc_fmt_tag(obj.tag_number)))
        }
    }
}

#[cfg(feature = "std")]
fn alloc_fmt_tag(tag_number: u8) -> std::string::String {
    std::format!("unrecognized application tag number {} for a property value", tag_number)
}

#[cfg(not(feature = "std"))]
fn alloc_fmt_tag(tag_number: u8) -> alloc::string::String {
    alloc::format!("unrecognized application tag number {} for a property value", tag_number)
}

/// `WriteProperty` request: object, property, value, optional array index
/// (not built by this crate's constructors but tolerated on decode via the
/// object stream shape), and priority.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePropertyRequest {
    pub object_type: u16,
    pub instance: u32,
    pub property_id: u32,
    pub value: Value,
    pub priority: Option<u8>,
}

impl WritePropertyRequest {
    pub fn new(object_type: u16, instance: u32, property_id: u32, value: Value, priority: Option<u8>) -> Self {
        Self {
            object_type,
            instance,
            property_id,
            value,
            priority,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        let mut objects = vec![
            ApduItem::Object(context_object_identifier(0, self.object_type, self.instance)),
            ApduItem::Object(encode_context_unsigned(1, self.property_id)),
            ApduItem::NamedTag(crate::encoding::NamedTag::opening(3)),
            ApduItem::Object(self.value.to_object()),
            ApduItem::Object(crate::encoding::encode_application_null()),
            ApduItem::NamedTag(crate::encoding::NamedTag::closing(3)),
        ];
        if let Some(priority) = self.priority {
            objects.push(ApduItem::Object(encode_context_unsigned(4, priority as u32)));
        }
        objects
    }

    /// Decodes `... object, property, opening-tag(3), value, optional Null,
    /// closing-tag(3), [priority]`. The Null between the value and the
    /// closing tag is tolerated whether or not it is present, since a peer
    /// may omit it.
    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() < 5 {
            return Err(BacnetError::WrongObjectCount {
                expected: 5,
                found: objects.len(),
            });
        }
        let (object_type, instance) = decode_context_object_identifier(objects[0].as_object()?, 0)?;
        let property_id = decode_context_unsigned(objects[1].as_object()?, 1)?;
        let opening = objects[2].as_named_tag()?;
        if opening.kind != NamedTagKind::Opening || opening.tag_number != 3 {
            return Err(BacnetError::Malformed("expected opening tag 3 before value".into()));
        }
        let value = Value::from_object(objects[3].as_object()?)?;

        let mut next = 4;
        if let Ok(obj) = objects[next].as_object() {
            if obj.tag_class == TagClass::Application && obj.tag_number == ApplicationTag::Null as u8 {
                next += 1;
            }
        }
        if next >= objects.len() {
            return Err(BacnetError::WrongObjectCount {
                expected: next + 1,
                found: objects.len(),
            });
        }
        let closing = objects[next].as_named_tag()?;
        if closing.kind != NamedTagKind::Closing || closing.tag_number != 3 {
            return Err(BacnetError::Malformed("expected closing tag 3 after value".into()));
        }
        next += 1;

        let priority = if objects.len() > next {
            Some(decode_context_unsigned(objects[next].as_object()?, 4)? as u8)
        } else {
            None
        };
        Ok(Self {
            object_type,
            instance,
            property_id,
            value,
            priority,
        })
    }
}

/// `ReadProperty`/`ReadPropertyMultiple` ComplexAck view: object, property,
/// and the present value bracketed by opening/closing tag 3.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexAckReadProperty {
    pub object_type: u16,
    pub instance: u32,
    pub property_id: u32,
    pub present_value: Value,
}

impl ComplexAckReadProperty {
    pub fn new(object_type: u16, instance: u32, property_id: u32, present_value: Value) -> Self {
        Self {
            object_type,
            instance,
            property_id,
            present_value,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        vec![
            ApduItem::Object(context_object_identifier(0, self.object_type, self.instance)),
            ApduItem::Object(encode_context_unsigned(1, self.property_id)),
            ApduItem::NamedTag(crate::encoding::NamedTag::opening(3)),
            ApduItem::Object(self.present_value.to_object()),
            ApduItem::NamedTag(crate::encoding::NamedTag::closing(3)),
        ]
    }

    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() != 5 {
            return Err(BacnetError::WrongObjectCount {
                expected: 5,
                found: objects.len(),
            });
        }
        let (object_type, instance) = decode_context_object_identifier(objects[0].as_object()?, 0)?;
        let property_id = decode_context_unsigned(objects[1].as_object()?, 1)?;
        let opening = objects[2].as_named_tag()?;
        if opening.kind != NamedTagKind::Opening || opening.tag_number != 3 {
            return Err(BacnetError::Malformed("expected opening tag 3 before present value".into()));
        }
        let present_value = Value::from_object(objects[3].as_object()?)?;
        let closing = objects[4].as_named_tag()?;
        if closing.kind != NamedTagKind::Closing || closing.tag_number != 3 {
            return Err(BacnetError::Malformed("expected closing tag 3 after present value, found an unbalanced tag".into()));
        }
        Ok(Self {
            object_type,
            instance,
            property_id,
            present_value,
        })
    }
}

/// `Error` PDU payload: two application-tagged Enumerated objects, error
/// class and error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPayload {
    pub error_class: u32,
    pub error_code: u32,
}

impl ErrorPayload {
    pub fn new(error_class: u32, error_code: u32) -> Self {
        Self {
            error_class,
            error_code,
        }
    }

    pub fn to_objects(&self) -> Vec<ApduItem> {
        vec![
            ApduItem::Object(encode_application_enumerated(self.error_class)),
            ApduItem::Object(encode_application_enumerated(self.error_code)),
        ]
    }

    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() != 2 {
            return Err(BacnetError::WrongObjectCount {
                expected: 2,
                found: objects.len(),
            });
        }
        let error_class = decode_enumerated_value(objects[0].as_object()?)?;
        let error_code = decode_enumerated_value(objects[1].as_object()?)?;
        Ok(Self {
            error_class,
            error_code,
        })
    }
}

/// `SegmentAck` payload. The retrieved source this crate is derived from
/// requires exactly 4 trailing objects and then drops the first two before
/// decoding an error-class/error-code pair — an inconsistency flagged in
/// `DESIGN.md` rather than silently reinterpreted, since the real
/// `SegmentAck` wire shape (sequence number + actual window size, carrying
/// no error objects at all) can't be derived with confidence from the
/// retrieved source. This type preserves that shape for the covered
/// surface: decoding fewer than 4 objects is `WrongObjectCount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentAckPayload {
    pub error_class: u32,
    pub error_code: u32,
}

impl SegmentAckPayload {
    pub fn from_objects(objects: &[ApduItem]) -> Result<Self> {
        if objects.len() != 4 {
            return Err(BacnetError::WrongObjectCount {
                expected: 4,
                found: objects.len(),
            });
        }
        let tail = &objects[2..];
        let error_class = decode_enumerated_value(tail[0].as_object()?)?;
        let error_code = decode_enumerated_value(tail[1].as_object()?)?;
        Ok(Self {
            error_class,
            error_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iam_round_trips_device_321() {
        let iam = IAmRequest::new(321, 1024, 0, 1);
        let objects = iam.to_objects();
        let decoded = IAmRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded, iam);
    }

    #[test]
    fn iam_device_identifier_matches_scenario() {
        let iam = IAmRequest::new(321, 1024, 0, 1);
        let device_obj = match &iam.to_objects()[0] {
            ApduItem::Object(o) => o.encode().unwrap(),
            _ => panic!("expected object"),
        };
        assert_eq!(&device_obj[..1], &[0xC4]);
        let (object_type, instance) = crate::encoding::unpack_object_identifier(&device_obj[1..]).unwrap();
        assert_eq!(object_type, crate::object::ObjectType::Device as u16);
        assert_eq!(instance, 321);
    }

    #[test]
    fn read_property_analog_output_present_value() {
        let req = ReadPropertyRequest::new(crate::object::ObjectType::AnalogOutput as u16, 1, 85);
        let objects = req.to_objects();
        let decoded = ReadPropertyRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded, req);
        let property_tag = match &objects[1] {
            ApduItem::Object(o) => o.encode().unwrap(),
            _ => panic!("expected object"),
        };
        assert_eq!(property_tag, vec![0x19, 0x55]);
    }

    #[test]
    fn write_property_real_with_priority() {
        let req = WritePropertyRequest::new(
            crate::object::ObjectType::AnalogOutput as u16,
            1,
            85,
            Value::Real(72.0),
            Some(8),
        );
        let objects = req.to_objects();
        let decoded = WritePropertyRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn write_property_without_priority() {
        let req = WritePropertyRequest::new(1, 1, 85, Value::Real(1.0), None);
        let objects = req.to_objects();
        assert_eq!(objects.len(), 6);
        let decoded = WritePropertyRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded.priority, None);
    }

    #[test]
    fn write_property_decodes_without_optional_null() {
        let req = WritePropertyRequest::new(
            crate::object::ObjectType::AnalogOutput as u16,
            1,
            85,
            Value::Real(72.0),
            Some(8),
        );
        let mut objects = req.to_objects();
        let null_index = objects
            .iter()
            .position(|o| matches!(o, ApduItem::Object(obj) if obj.tag_class == TagClass::Application && obj.tag_number == ApplicationTag::Null as u8))
            .unwrap();
        objects.remove(null_index);
        let decoded = WritePropertyRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn complex_ack_real_present_value_scenario() {
        let ack = ComplexAckReadProperty::new(
            crate::object::ObjectType::AnalogOutput as u16,
            1,
            85,
            Value::Real(72.0),
        );
        let objects = ack.to_objects();
        let mut bytes = Vec::new();
        for o in &objects {
            o.encode_into(&mut bytes).unwrap();
        }
        assert_eq!(&bytes[bytes.len() - 7..], &[0x3E, 0x44, 0x42, 0x90, 0x00, 0x00, 0x3F]);

        let decoded = ComplexAckReadProperty::from_objects(&objects).unwrap();
        assert_eq!(decoded.present_value, Value::Real(72.0));
    }

    #[test]
    fn error_class_and_code_scenario() {
        let err = ErrorPayload::new(1, 31);
        let objects = err.to_objects();
        let mut bytes = Vec::new();
        for o in &objects {
            o.encode_into(&mut bytes).unwrap();
        }
        assert_eq!(bytes, vec![0x91, 0x01, 0x91, 0x1F]);
        let decoded = ErrorPayload::from_objects(&objects).unwrap();
        assert_eq!(decoded, err);
    }

    #[test]
    fn read_property_multiple_round_trips() {
        let req = ReadPropertyMultipleRequest::new(
            crate::object::ObjectType::AnalogInput as u16,
            1,
            vec![85, 77],
        );
        let objects = req.to_objects();
        let decoded = ReadPropertyMultipleRequest::from_objects(&objects).unwrap();
        assert_eq!(decoded, req);
    }

    #[test]
    fn segment_ack_requires_four_objects() {
        let objects = vec![
            ApduItem::Object(encode_application_unsigned(0)),
            ApduItem::Object(encode_application_unsigned(0)),
        ];
        let err = SegmentAckPayload::from_objects(&objects).unwrap_err();
        assert!(matches!(err, BacnetError::WrongObjectCount { .. }));
    }
}
