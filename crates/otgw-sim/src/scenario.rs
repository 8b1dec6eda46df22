//! Scenario loading and the simulation loop.
//!
//! A scenario file describes the boiler's data points and a script of
//! thermostat requests by tick number:
//!
//! ```yaml
//! ticks: 600
//! tick_ms: 100
//! boiler_points:
//!   - { message: Status, data: 10 }
//!   - { message: Tboiler, data: 11648 }
//! thermostat_requests:
//!   - { at_tick: 5, msg_type: WriteData, message: Status, data: 768 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use otgw_gateway::{Gateway, GatewayConfig};
use otgw_protocol::{DataId, Frame, MsgType};

use crate::boiler::SimBoiler;
use crate::sink::RecordingSink;
use crate::thermostat::SimThermostat;

/// Errors from loading a scenario file.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// The file could not be parsed.
    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One boiler data point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PointSpec {
    /// The data identifier.
    pub message: DataId,
    /// The raw 16-bit payload the boiler reports.
    pub data: u16,
}

/// One scripted thermostat request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestSpec {
    /// Tick number at which the request arrives.
    pub at_tick: u32,
    /// Request message type.
    pub msg_type: MsgType,
    /// Data identifier.
    pub message: DataId,
    /// Raw payload.
    #[serde(default)]
    pub data: u16,
}

/// A simulation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Number of ticks to run.
    #[serde(default = "default_ticks")]
    pub ticks: u32,
    /// Tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u32,
    /// Boiler data points.
    #[serde(default)]
    pub boiler_points: Vec<PointSpec>,
    /// Scripted thermostat requests.
    #[serde(default)]
    pub thermostat_requests: Vec<RequestSpec>,
}

fn default_ticks() -> u32 {
    600
}

fn default_tick_ms() -> u32 {
    100
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario {
            ticks: default_ticks(),
            tick_ms: default_tick_ms(),
            boiler_points: Vec::new(),
            thermostat_requests: Vec::new(),
        }
    }
}

impl Scenario {
    /// Parse a scenario from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }
}

/// Outcome of a scenario run.
pub struct ScenarioRun {
    /// The gateway after the last tick, for state inspection.
    pub gateway: Gateway<SimThermostat, SimBoiler, RecordingSink>,
}

impl ScenarioRun {
    /// Every value published during the run.
    pub fn events(&self) -> &[(&'static str, otgw_gateway::Value)] {
        self.gateway.sink_ref().events()
    }
}

/// Run a scenario against a fresh gateway.
pub fn run_scenario(config: &GatewayConfig, scenario: &Scenario) -> ScenarioRun {
    let boiler = SimBoiler::with_points(
        scenario
            .boiler_points
            .iter()
            .map(|p| (p.message, p.data)),
    );

    let mut gateway = Gateway::new(
        SimThermostat::new(),
        Some(boiler),
        RecordingSink::new(),
        config,
    );

    let mut now_ms = 0u64;
    for tick in 0..scenario.ticks {
        for request in &scenario.thermostat_requests {
            if request.at_tick == tick {
                gateway.thermostat_mut().push_request(Frame::build(
                    request.msg_type,
                    request.message,
                    request.data,
                ));
            }
        }
        gateway.tick(now_ms);
        now_ms += u64::from(scenario.tick_ms);
    }

    ScenarioRun { gateway }
}

/// A ready-made scenario: a thermostat cycling Status and room setpoint
/// writes against a boiler with a plausible set of data points.
pub fn demo_scenario() -> Scenario {
    Scenario {
        ticks: 600,
        tick_ms: 100,
        boiler_points: vec![
            PointSpec {
                message: DataId::Status,
                data: 0x000A,
            },
            PointSpec {
                message: DataId::SConfigSMemberId,
                data: 0x0100,
            },
            PointSpec {
                message: DataId::Tboiler,
                data: 0x2D80,
            },
            PointSpec {
                message: DataId::Tdhw,
                data: 0x3340,
            },
            PointSpec {
                message: DataId::Toutside,
                data: 0x0880,
            },
        ],
        thermostat_requests: vec![
            RequestSpec {
                at_tick: 2,
                msg_type: MsgType::WriteData,
                message: DataId::Status,
                data: 0x0300,
            },
            RequestSpec {
                at_tick: 4,
                msg_type: MsgType::WriteData,
                message: DataId::TrSet,
                data: 0x1400,
            },
        ],
    }
}
