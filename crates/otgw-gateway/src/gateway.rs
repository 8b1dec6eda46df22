//! The relay engine and poll scheduler.
//!
//! A single [`Gateway`] owns both bus links, the publish sink and all
//! scheduling state, and is driven by [`Gateway::tick`] from a periodic
//! main loop. Per tick it is in exactly one of two phases:
//!
//! - **Initializing**: once a Status response has been observed and the
//!   boiler link is ready, the configured initial messages are queried
//!   one per tick; the phase then ends permanently.
//! - **Running**: pending thermostat traffic is relayed first; when the
//!   thermostat side is idle, at most one auto-update poll may be issued,
//!   rate-limited so gateway-originated traffic cannot saturate the bus.
//!
//! Nothing in here is fatal: transmission faults, timeouts and unknown
//! identifiers all degrade to "try again next opportunity".

use std::collections::HashMap;

use otgw_protocol::{payload, DataId, Frame, LinkState, MsgType, RxStatus};

use crate::config::GatewayConfig;
use crate::link::BusLink;
use crate::publish::{PublishSink, Value};
use crate::registry;
use crate::schedule::{AutoUpdateTable, InitialMessages};
use crate::status::{DateAccumulator, GatewayStatus, StatusGates};

/// Minimum spacing between gateway-originated exchanges.
const AUTO_UPDATE_GUARD_MS: u32 = 2000;

/// Target name the composite date string is published under.
const TIME_DATE_TARGET: &str = "time_date";

/// The gateway: relay engine plus poll scheduler.
///
/// `T` is the thermostat-side link (gateway acts as slave), `B` the
/// boiler-side link (gateway acts as master), `P` the publish sink.
/// The boiler link is optional so a gateway wired up before its boiler
/// side exists degrades to a pure listener.
pub struct Gateway<T: BusLink, B: BusLink, P: PublishSink> {
    thermostat: T,
    boiler: Option<B>,
    sink: P,

    status: GatewayStatus,
    gates: StatusGates,
    date: DateAccumulator,

    initial: InitialMessages,
    auto_update: AutoUpdateTable,
    overrides: HashMap<DataId, f32>,

    initializing: bool,
    last_tick_ms: Option<u64>,
    since_auto_update_ms: u32,
}

impl<T: BusLink, B: BusLink, P: PublishSink> Gateway<T, B, P> {
    /// Create a gateway from its links, sink and configuration.
    pub fn new(thermostat: T, boiler: Option<B>, sink: P, config: &GatewayConfig) -> Self {
        let mut initial = InitialMessages::new();
        for &id in &config.initial_messages {
            initial.add(id);
        }

        let mut auto_update = AutoUpdateTable::new();
        for spec in &config.auto_update {
            auto_update.add(spec.message, spec.interval_secs);
        }

        let overrides = config.overrides.iter().map(|&id| (id, 0.0)).collect();

        let gates = StatusGates {
            ch_enable: config.gates.ch_enable,
            dhw_enable: config.gates.dhw_enable,
            cooling_enable: config.gates.cooling_enable,
            otc_active: config.gates.otc_active,
            ch2_active: config.gates.ch2_active,
            ..Default::default()
        };

        Gateway {
            thermostat,
            boiler,
            sink,
            status: GatewayStatus::default(),
            gates,
            date: DateAccumulator::default(),
            initial,
            auto_update,
            overrides,
            initializing: true,
            last_tick_ms: None,
            since_auto_update_ms: 0,
        }
    }

    /// The latched status flags.
    pub fn status(&self) -> &GatewayStatus {
        &self.status
    }

    /// The thermostat-side link.
    pub fn thermostat_mut(&mut self) -> &mut T {
        &mut self.thermostat
    }

    /// The boiler-side link, when attached.
    pub fn boiler_mut(&mut self) -> Option<&mut B> {
        self.boiler.as_mut()
    }

    /// The publish sink.
    pub fn sink_ref(&self) -> &P {
        &self.sink
    }

    /// The status request gates, for runtime adjustment.
    pub fn gates_mut(&mut self) -> &mut StatusGates {
        &mut self.gates
    }

    /// The auto-update table.
    pub fn auto_update(&self) -> &AutoUpdateTable {
        &self.auto_update
    }

    /// Whether the startup sweep has not finished yet.
    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    /// Set an override value for an identifier with a configured slot.
    ///
    /// A value of exactly zero means "no override": the thermostat's own
    /// payload passes through unchanged. An override can therefore never
    /// silently command a zero setpoint.
    pub fn set_override(&mut self, id: DataId, value: f32) {
        match self.overrides.get_mut(&id) {
            Some(slot) => *slot = value,
            None => log::warn!("no override slot configured for {}", id),
        }
    }

    /// Clear an override, restoring pass-through.
    pub fn clear_override(&mut self, id: DataId) {
        self.set_override(id, 0.0);
    }

    /// Drive the gateway; `now_ms` comes from a monotonic clock.
    pub fn tick(&mut self, now_ms: u64) {
        let delta_ms = match self.last_tick_ms {
            Some(prev) => now_ms.saturating_sub(prev).min(u64::from(u32::MAX)) as u32,
            None => 0,
        };
        self.last_tick_ms = Some(now_ms);

        if self.initializing && self.status.status_received {
            if self.boiler.as_ref().is_some_and(|b| b.is_ready()) {
                self.initial_step();
            }
            return;
        }

        let processed = match self.thermostat.poll() {
            Some((frame, rx)) => {
                self.on_thermostat_request(frame, rx);
                true
            }
            None => false,
        };

        self.auto_update.advance(delta_ms);
        self.since_auto_update_ms = self.since_auto_update_ms.saturating_add(delta_ms);

        // Gateway-originated polls only go out while the thermostat side
        // sits in its inter-message delay, and at most one every
        // AUTO_UPDATE_GUARD_MS, so they cannot collide with live traffic.
        if !processed
            && self.since_auto_update_ms >= AUTO_UPDATE_GUARD_MS
            && self.thermostat.state() == LinkState::Delay
            && self.boiler.as_ref().is_some_and(|b| b.is_ready())
        {
            self.auto_update_step();
        }
    }

    /// Relay one thermostat request toward the boiler.
    pub fn on_thermostat_request(&mut self, request: Frame, rx: RxStatus) {
        if request.is_null() {
            return;
        }

        let data_id = request.data_id();
        log::debug!(
            "thermostat request ({}): type {}, id {}, data {:04X} ({:?})",
            request,
            request.msg_type(),
            data_id,
            request.payload(),
            rx
        );

        if rx != RxStatus::Success {
            return;
        }

        let override_value = self
            .overrides
            .get(&data_id)
            .copied()
            .filter(|value| *value != 0.0);

        let Some(boiler) = self.boiler.as_mut() else {
            return;
        };

        let forward = match override_value {
            Some(value) => {
                let rebuilt =
                    boiler.build_request(MsgType::WriteData, data_id, payload::write_f88(value));
                log::debug!("override for {}: {} ({} -> {})", data_id, value, request, rebuilt);
                rebuilt
            }
            None => request,
        };

        let response = boiler.send_request(forward);
        if response.is_null() {
            log::debug!("no boiler response for {}", data_id);
            return;
        }

        // The thermostat gets the boiler's actual answer, not an echo of
        // its own request.
        self.thermostat.send_response(response);
        self.handle_boiler_response(response.msg_type(), response.data_id(), response.payload());
    }

    /// Decode a boiler response and fan the results out.
    pub fn handle_boiler_response(&mut self, msg_type: MsgType, data_id: DataId, data: u16) {
        log::debug!(
            "boiler response [type {}, id {}, data {:04X}]",
            msg_type,
            data_id,
            data
        );

        // The status latch updates whether or not anything subscribes to
        // the Status message.
        if data_id == DataId::Status {
            self.status.update_from(data);
        }

        let mut handled = false;
        match data_id {
            DataId::DayTime => {
                self.date.set_day_time(data);
                self.publish_date();
                handled = true;
            }
            DataId::Date => {
                self.date.set_date(data);
                self.publish_date();
                handled = true;
            }
            DataId::Year => {
                self.date.set_year(data);
                self.publish_date();
                handled = true;
            }
            _ => {}
        }

        if !handled {
            if let Some(spec) = registry::lookup(data_id) {
                for binding in spec.bindings {
                    self.sink.publish(binding.target, binding.shape.decode(data));
                }
                handled = true;
            }
        }

        if handled {
            self.auto_update.mark_updated(data_id);
        } else {
            log::debug!(
                "unhandled response [type {}, id {}, data {:04X}]",
                msg_type,
                data_id,
                data
            );
        }
    }

    /// Build a gateway-originated request for an identifier.
    ///
    /// Status requests carry the gated enable flags; everything else is a
    /// plain read. Null when no boiler link exists.
    pub fn build_request(&self, data_id: DataId) -> Frame {
        let Some(boiler) = self.boiler.as_ref() else {
            return Frame::NULL;
        };

        if data_id == DataId::Status {
            let data = self.gates.gated_payload(&self.status);
            return boiler.build_request(MsgType::WriteData, DataId::Status, data);
        }

        boiler.build_request(MsgType::ReadData, data_id, 0)
    }

    fn initial_step(&mut self) {
        let Some(data_id) = self.initial.next() else {
            log::debug!("initial message sweep complete");
            self.initializing = false;
            return;
        };

        let request = self.build_request(data_id);
        if request.is_null() {
            return;
        }
        let Some(boiler) = self.boiler.as_mut() else {
            return;
        };

        let response = boiler.send_request(request);
        if !response.is_null() {
            log::debug!("initial poll response ({}) for {}", response, data_id);
            self.handle_boiler_response(
                response.msg_type(),
                response.data_id(),
                response.payload(),
            );
        }
    }

    fn auto_update_step(&mut self) {
        let Some(data_id) = self.auto_update.step_cursor() else {
            return;
        };

        let request = self.build_request(data_id);
        if request.is_null() {
            return;
        }
        let Some(boiler) = self.boiler.as_mut() else {
            return;
        };

        let response = boiler.send_request(request);
        if response.is_null() {
            // Timeout: leave the guard and the entry's elapsed time
            // untouched so the natural retry cadence applies.
            log::debug!("no auto-update response for {}", data_id);
            return;
        }

        self.since_auto_update_ms = 0;
        log::debug!("auto-update response ({}) for {}", response, data_id);
        self.handle_boiler_response(response.msg_type(), response.data_id(), response.payload());
    }

    fn publish_date(&mut self) {
        if let Some(formatted) = self.date.take_publish() {
            self.sink.publish(TIME_DATE_TARGET, Value::Text(formatted));
        }
    }
}
