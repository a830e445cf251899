#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod app;
pub mod datalink;
pub mod encoding;
pub mod error;
pub mod message;
pub mod network;
pub mod object;
pub mod service;

// Re-export main types without glob imports to avoid conflicts
pub use datalink::{BvlcFunction, BvlcHeader, BVLC_TYPE};
pub use encoding::{ApplicationTag, TagClass};
pub use error::{BacnetError, Result};
pub use message::Message;
pub use network::Npdu;
pub use object::{ObjectType, PropertyIdentifier};

#[cfg(feature = "std")]
extern crate std;

#[cfg(not(feature = "std"))]
extern crate alloc;

pub const BACNET_PROTOCOL_VERSION: u8 = 1;
pub const BACNET_MAX_APDU: usize = 1476;
pub const BACNET_MAX_MPDU: usize = 1497;

#[cfg(test)]
mod tests {
    use crate::object::ObjectIdentifier;
    use crate::{ApplicationTag, ObjectType};

    #[test]
    fn test_no_std_types() {
        // Types work the same whether std is enabled or not.
        let tag = ApplicationTag::Boolean;
        assert_eq!(tag as u8, 1);

        let obj_type = ObjectType::AnalogInput;
        assert_eq!(obj_type as u16, 0);

        let obj_id = ObjectIdentifier::new(ObjectType::Device, 123);
        assert_eq!(obj_id.instance, 123);
        assert!(obj_id.is_valid());
    }

    #[test]
    fn test_bacnet_error_formats() {
        let err = crate::error::BacnetError::NotImplemented("test".into());
        #[cfg(feature = "std")]
        let _ = std::format!("{}", err);
        #[cfg(not(feature = "std"))]
        let _ = alloc::format!("{}", err);
    }
}
