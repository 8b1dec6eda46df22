//! OpenTherm Application-Layer Protocol
//!
//! This crate provides the types and pure conversion functions for working
//! with OpenTherm frames at the application layer. OpenTherm is a
//! point-to-point master/slave protocol between a room thermostat (master)
//! and a boiler (slave), exchanging 32-bit frames.
//!
//! # Frame Overview
//!
//! Every exchange is a single 32-bit frame:
//!
//! - **Requests** (master → slave): READ-DATA or WRITE-DATA
//! - **Responses** (slave → master): READ-ACK, WRITE-ACK, DATA-INVALID
//!   or UNKNOWN-DATAID
//!
//! The 16-bit data field is interpreted per data-id as flags, bytes,
//! integers or an f8.8 fixed-point number; see [`payload`] for the
//! conversion functions.
//!
//! # Example
//!
//! ```rust
//! use otgw_protocol::{payload, DataId, Frame, MsgType};
//!
//! // Build a read request for the boiler water temperature
//! let request = Frame::build(MsgType::ReadData, DataId::Tboiler, 0);
//!
//! // Decode a response payload as f8.8
//! let temperature = payload::parse_f88(0x2D80);
//! assert_eq!(temperature, 45.5);
//! ```

mod error;
mod frame;
pub mod payload;
mod types;

pub use error::*;
pub use frame::*;
pub use types::*;
