//! Data link layer: the BVLC Codec.
//!
//! BACnet/IP's link-layer encapsulation (BVLC) is the only data link this
//! crate covers; MS/TP, Ethernet, and point-to-point encapsulations are out
//! of scope (see `DESIGN.md`). Transport — opening sockets, sending and
//! receiving datagrams — is likewise an external collaborator: this module
//! only encodes and decodes the four-byte header.

pub mod bip;

pub use bip::{BvlcFunction, BvlcHeader, BVLC_TYPE};
