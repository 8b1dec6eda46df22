//! Fan-out of decoded values to named publish targets.

use std::fmt;

/// A decoded payload value on its way to a target.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single flag.
    Bool(bool),
    /// An unsigned byte.
    U8(u8),
    /// A signed byte.
    S8(i8),
    /// The whole field, unsigned.
    U16(u16),
    /// The whole field, signed.
    S16(i16),
    /// An f8.8 fixed-point number.
    F32(f32),
    /// Rendered text (flag states, the composite date).
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::U8(v) => write!(f, "{}", v),
            Value::S8(v) => write!(f, "{}", v),
            Value::U16(v) => write!(f, "{}", v),
            Value::S16(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Receiver for decoded values.
///
/// Publishing is fire-and-forget: no return value, assumed to succeed.
/// The presentation layer (sensors, switches, dashboards) lives behind
/// this trait.
pub trait PublishSink {
    /// Deliver one value to a named target.
    fn publish(&mut self, target: &'static str, value: Value);
}

/// A sink that discards every value.
#[derive(Debug, Default)]
pub struct NullSink;

impl PublishSink for NullSink {
    fn publish(&mut self, _target: &'static str, _value: Value) {}
}
