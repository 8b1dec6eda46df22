//! # otgw-sim
//!
//! Deterministic test doubles and a scenario runner for the OpenTherm
//! gateway. The real bus drivers capture edges in interrupt context and
//! cannot run on a workstation; these simulated links implement the same
//! [`otgw_gateway::BusLink`] boundary with scripted, repeatable behavior:
//!
//! - [`SimBoiler`] answers read/write requests from a table of data
//!   points and can inject failures;
//! - [`SimThermostat`] replays a scripted queue of thermostat requests
//!   and records what the gateway relays back;
//! - [`RecordingSink`] captures every published value.
//!
//! [`Scenario`] ties them together for the `otgw-sim` binary and the
//! integration tests.

mod boiler;
mod scenario;
mod sink;
mod thermostat;

pub use boiler::*;
pub use scenario::*;
pub use sink::*;
pub use thermostat::*;
