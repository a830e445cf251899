//! Object identity constants.
//!
//! BACnet objects are identified by a packed `(object_type, instance)` pair
//! (see [`crate::encoding::pack_object_identifier`] for the wire form).
//! This module defines the `ObjectType` and `PropertyIdentifier` enums the
//! covered services need to express that identity and to name a property
//! by its standard identifier — it does not model object instances,
//! property storage, or a device object database, all of which are out of
//! scope for this crate.

#[cfg(feature = "std")]
use std::error::Error;

#[cfg(feature = "std")]
use std::fmt;

#[cfg(not(feature = "std"))]
use core::fmt;

#[cfg(not(feature = "std"))]
use alloc::{format, string::String};

/// Result type for object-identity operations.
#[cfg(feature = "std")]
pub type Result<T> = std::result::Result<T, ObjectError>;

#[cfg(not(feature = "std"))]
pub type Result<T> = core::result::Result<T, ObjectError>;

/// Errors raised converting wire values into `ObjectType`/`PropertyIdentifier`.
#[derive(Debug)]
pub enum ObjectError {
    InvalidValue(String),
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectError::InvalidValue(msg) => write!(f, "invalid value: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl Error for ObjectError {}

/// Standard BACnet object types (ASHRAE 135 clause 12), restricted to the
/// range this crate's services actually reference plus enough of the
/// standard catalog to be a useful constant table at the public boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ObjectType {
    AnalogInput = 0,
    AnalogOutput = 1,
    AnalogValue = 2,
    BinaryInput = 3,
    BinaryOutput = 4,
    BinaryValue = 5,
    Calendar = 6,
    Command = 7,
    Device = 8,
    EventEnrollment = 9,
    File = 10,
    Group = 11,
    Loop = 12,
    MultiStateInput = 13,
    MultiStateOutput = 14,
    NotificationClass = 15,
    Program = 16,
    Schedule = 17,
    Averaging = 18,
    MultiStateValue = 19,
    TrendLog = 20,
    LifeSafetyPoint = 21,
    LifeSafetyZone = 22,
    Accumulator = 23,
    PulseConverter = 24,
    EventLog = 25,
    GlobalGroup = 26,
    TrendLogMultiple = 27,
    LoadControl = 28,
    StructuredView = 29,
    AccessDoor = 30,
}

impl TryFrom<u16> for ObjectType {
    type Error = ObjectError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            0 => Ok(ObjectType::AnalogInput),
            1 => Ok(ObjectType::AnalogOutput),
            2 => Ok(ObjectType::AnalogValue),
            3 => Ok(ObjectType::BinaryInput),
            4 => Ok(ObjectType::BinaryOutput),
            5 => Ok(ObjectType::BinaryValue),
            6 => Ok(ObjectType::Calendar),
            7 => Ok(ObjectType::Command),
            8 => Ok(ObjectType::Device),
            9 => Ok(ObjectType::EventEnrollment),
            10 => Ok(ObjectType::File),
            11 => Ok(ObjectType::Group),
            12 => Ok(ObjectType::Loop),
            13 => Ok(ObjectType::MultiStateInput),
            14 => Ok(ObjectType::MultiStateOutput),
            15 => Ok(ObjectType::NotificationClass),
            16 => Ok(ObjectType::Program),
            17 => Ok(ObjectType::Schedule),
            18 => Ok(ObjectType::Averaging),
            19 => Ok(ObjectType::MultiStateValue),
            20 => Ok(ObjectType::TrendLog),
            21 => Ok(ObjectType::LifeSafetyPoint),
            22 => Ok(ObjectType::LifeSafetyZone),
            23 => Ok(ObjectType::Accumulator),
            24 => Ok(ObjectType::PulseConverter),
            25 => Ok(ObjectType::EventLog),
            26 => Ok(ObjectType::GlobalGroup),
            27 => Ok(ObjectType::TrendLogMultiple),
            28 => Ok(ObjectType::LoadControl),
            29 => Ok(ObjectType::StructuredView),
            30 => Ok(ObjectType::AccessDoor),
            other => Err(ObjectError::InvalidValue(format!("unknown object type: {}", other))),
        }
    }
}

/// Standard BACnet property identifiers, restricted to those referenced by
/// the covered services plus the commonly-needed device-identity
/// properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PropertyIdentifier {
    AckedTransitions = 0,
    AckRequired = 1,
    Action = 2,
    ActionText = 3,
    ActiveText = 4,
    All = 8,
    ApplicationSoftwareVersion = 12,
    DatabaseRevision = 155,
    FirmwareRevision = 44,
    MaxApduLengthAccepted = 62,
    ModelName = 70,
    ObjectIdentifier = 75,
    ObjectList = 76,
    ObjectName = 77,
    ObjectType = 79,
    OutOfService = 81,
    OutputUnits = 82,
    PresentValue = 85,
    Priority = 86,
    PriorityArray = 87,
    ProcessIdentifier = 89,
    ProtocolRevision = 139,
    ProtocolVersion = 98,
    SegmentationSupported = 107,
    SystemStatus = 112,
    VendorIdentifier = 120,
    VendorName = 121,
}

impl TryFrom<u32> for PropertyIdentifier {
    type Error = ObjectError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(PropertyIdentifier::AckedTransitions),
            1 => Ok(PropertyIdentifier::AckRequired),
            2 => Ok(PropertyIdentifier::Action),
            3 => Ok(PropertyIdentifier::ActionText),
            4 => Ok(PropertyIdentifier::ActiveText),
            8 => Ok(PropertyIdentifier::All),
            12 => Ok(PropertyIdentifier::ApplicationSoftwareVersion),
            44 => Ok(PropertyIdentifier::FirmwareRevision),
            62 => Ok(PropertyIdentifier::MaxApduLengthAccepted),
            70 => Ok(PropertyIdentifier::ModelName),
            75 => Ok(PropertyIdentifier::ObjectIdentifier),
            76 => Ok(PropertyIdentifier::ObjectList),
            77 => Ok(PropertyIdentifier::ObjectName),
            79 => Ok(PropertyIdentifier::ObjectType),
            81 => Ok(PropertyIdentifier::OutOfService),
            82 => Ok(PropertyIdentifier::OutputUnits),
            85 => Ok(PropertyIdentifier::PresentValue),
            86 => Ok(PropertyIdentifier::Priority),
            87 => Ok(PropertyIdentifier::PriorityArray),
            89 => Ok(PropertyIdentifier::ProcessIdentifier),
            98 => Ok(PropertyIdentifier::ProtocolVersion),
            107 => Ok(PropertyIdentifier::SegmentationSupported),
            112 => Ok(PropertyIdentifier::SystemStatus),
            120 => Ok(PropertyIdentifier::VendorIdentifier),
            121 => Ok(PropertyIdentifier::VendorName),
            139 => Ok(PropertyIdentifier::ProtocolRevision),
            155 => Ok(PropertyIdentifier::DatabaseRevision),
            other => Err(ObjectError::InvalidValue(format!("unknown property identifier: {}", other))),
        }
    }
}

/// Object identifier: a BACnet object type paired with an instance number
/// (0..=0x3FFFFF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    pub object_type: ObjectType,
    pub instance: u32,
}

impl ObjectIdentifier {
    pub fn new(object_type: ObjectType, instance: u32) -> Self {
        Self {
            object_type,
            instance,
        }
    }

    /// Instance numbers occupy 22 bits of the packed wire form.
    pub fn is_valid(&self) -> bool {
        self.instance <= 0x3F_FFFF
    }
}
