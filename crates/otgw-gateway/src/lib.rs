//! # otgw-gateway
//!
//! The relay/scheduling engine of an OpenTherm gateway: a device that sits
//! between a heating thermostat and a boiler, relays every thermostat
//! request, optionally overrides request payloads, decodes boiler
//! responses and fans decoded values out to named publish targets, and
//! independently polls the boiler for additional data points during idle
//! windows on the bus.
//!
//! The engine is single-threaded and driven by a periodic tick with an
//! externally supplied monotonic millisecond clock:
//!
//! ```rust,ignore
//! use otgw_gateway::{Gateway, GatewayConfig};
//!
//! let config = GatewayConfig::load(path)?;
//! let mut gateway = Gateway::new(thermostat, boiler, sink, &config)?;
//! loop {
//!     gateway.tick(clock.now_ms());
//! }
//! ```
//!
//! Bus drivers are injected behind the [`BusLink`] trait; decoded values
//! leave through the [`PublishSink`] trait. Neither side is owned by this
//! crate, which lets tests substitute deterministic fakes.

mod config;
mod gateway;
mod link;
mod publish;
pub mod registry;
mod schedule;
mod status;

pub use config::*;
pub use gateway::*;
pub use link::*;
pub use publish::*;
pub use schedule::*;
pub use status::*;
