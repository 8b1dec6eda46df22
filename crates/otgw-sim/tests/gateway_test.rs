//! End-to-end tests driving the full gateway against simulated links.

use otgw_gateway::{Gateway, GatewayConfig, Value};
use otgw_protocol::{DataId, Frame, MsgType, RxStatus};
use otgw_sim::{demo_scenario, run_scenario, RecordingSink, SimBoiler, SimThermostat};

fn init_logging() {
    env_logger::try_init().ok();
}

fn new_gateway(
    config: &GatewayConfig,
    boiler: SimBoiler,
) -> Gateway<SimThermostat, SimBoiler, RecordingSink> {
    Gateway::new(SimThermostat::new(), Some(boiler), RecordingSink::new(), config)
}

/// Drive `count` ticks with the given period.
fn run_ticks(
    gateway: &mut Gateway<SimThermostat, SimBoiler, RecordingSink>,
    start_ms: u64,
    count: u32,
    period_ms: u64,
) -> u64 {
    let mut now = start_ms;
    for _ in 0..count {
        gateway.tick(now);
        now += period_ms;
    }
    now
}

// ============================================================================
// Relay Path
// ============================================================================

#[test]
fn test_relay_returns_boiler_answer_to_thermostat() {
    init_logging();
    let boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
    let mut gateway = new_gateway(&GatewayConfig::default(), boiler);

    gateway
        .thermostat_mut()
        .push_request(Frame::build(MsgType::ReadData, DataId::Tboiler, 0));
    gateway.tick(0);

    let responses = gateway.thermostat_mut().responses().to_vec();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].msg_type(), MsgType::ReadAck);
    assert_eq!(responses[0].payload(), 0x2D80);
    assert_eq!(
        gateway.sink_ref().last_for("t_boiler"),
        Some(&Value::F32(45.5))
    );
}

#[test]
fn test_faulty_thermostat_frame_is_dropped() {
    init_logging();
    let boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
    let mut gateway = new_gateway(&GatewayConfig::default(), boiler);

    gateway.thermostat_mut().push_with_status(
        Frame::build(MsgType::ReadData, DataId::Tboiler, 0),
        RxStatus::Timeout,
    );
    gateway.tick(0);

    assert!(gateway.thermostat_mut().responses().is_empty());
    assert!(gateway.boiler_mut().unwrap().requests().is_empty());
    assert!(gateway.sink_ref().events().is_empty());
}

#[test]
fn test_boiler_timeout_leaves_thermostat_unanswered() {
    init_logging();
    let mut boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
    boiler.fail_next(1);
    let mut gateway = new_gateway(&GatewayConfig::default(), boiler);

    gateway
        .thermostat_mut()
        .push_request(Frame::build(MsgType::ReadData, DataId::Tboiler, 0));
    gateway.tick(0);

    assert!(gateway.thermostat_mut().responses().is_empty());
    assert!(gateway.sink_ref().events().is_empty());
    assert!(!gateway.status().status_received);
}

// ============================================================================
// Status Latch and Gating
// ============================================================================

#[test]
fn test_status_exchange_latches_and_gates() {
    init_logging();
    // Slave low byte: CH active + flame on.
    let boiler = SimBoiler::with_points([(DataId::Status, 0x000A)]);
    let mut gateway = new_gateway(&GatewayConfig::default(), boiler);

    // Thermostat asserts CH enable only.
    gateway
        .thermostat_mut()
        .push_request(Frame::build(MsgType::WriteData, DataId::Status, 0x0100));
    gateway.tick(0);

    let status = *gateway.status();
    assert!(status.status_received);
    assert!(status.ch_enable);
    assert!(!status.dhw_enable);
    assert!(!status.cooling_enable);
    assert!(!status.otc_active);
    assert!(!status.ch2_active);

    // Ungated: the latched CH enable goes out again.
    assert_eq!(gateway.build_request(DataId::Status).payload(), 0x0100);

    // A zero CH setpoint gate blocks it.
    gateway.gates_mut().ch_setpoint = Some(0.0);
    assert_eq!(gateway.build_request(DataId::Status).payload(), 0x0000);

    // A positive setpoint lets it through again.
    gateway.gates_mut().ch_setpoint = Some(55.0);
    assert_eq!(gateway.build_request(DataId::Status).payload(), 0x0100);
}

// ============================================================================
// Override Injection
// ============================================================================

#[test]
fn test_room_setpoint_override_end_to_end() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.overrides.push(DataId::TrSet);
    let boiler = SimBoiler::new();
    let mut gateway = new_gateway(&config, boiler);

    // No override set: the request passes through untouched.
    let original = Frame::build(MsgType::WriteData, DataId::TrSet, 0x1200);
    gateway.thermostat_mut().push_request(original);
    gateway.tick(0);
    assert_eq!(gateway.boiler_mut().unwrap().requests()[0], original);

    // With an override, the forwarded frame carries the override payload.
    gateway.set_override(DataId::TrSet, 21.5);
    gateway.thermostat_mut().push_request(original);
    gateway.tick(100);
    let forwarded = gateway.boiler_mut().unwrap().requests()[1];
    assert_eq!(forwarded.msg_type(), MsgType::WriteData);
    assert_eq!(forwarded.payload(), 0x1580);

    // Clearing the override restores pass-through.
    gateway.clear_override(DataId::TrSet);
    gateway.thermostat_mut().push_request(original);
    gateway.tick(200);
    assert_eq!(gateway.boiler_mut().unwrap().requests()[2], original);
}

// ============================================================================
// Initialization Sweep
// ============================================================================

#[test]
fn test_initial_sweep_runs_once_after_status() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.initial_messages = vec![
        DataId::SConfigSMemberId,
        DataId::AsfFlags,
        DataId::MaxTSet,
    ];
    let boiler = SimBoiler::with_points([
        (DataId::Status, 0x0000),
        (DataId::SConfigSMemberId, 0x0101),
        (DataId::AsfFlags, 0x0000),
        (DataId::MaxTSet, 0x5000),
    ]);
    let mut gateway = new_gateway(&config, boiler);

    // Without a Status response the sweep is parked.
    run_ticks(&mut gateway, 0, 5, 100);
    assert!(gateway.is_initializing());
    assert!(gateway.boiler_mut().unwrap().requests().is_empty());

    // A relayed Status exchange releases it.
    gateway
        .thermostat_mut()
        .push_request(Frame::build(MsgType::WriteData, DataId::Status, 0x0300));
    let now = run_ticks(&mut gateway, 500, 1, 100);

    // One initial read per tick, in insertion order.
    run_ticks(&mut gateway, now, 4, 100);
    assert!(!gateway.is_initializing());

    let requests = gateway.boiler_mut().unwrap().requests().to_vec();
    // Status relay + three initial reads.
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[1].data_id(), DataId::SConfigSMemberId);
    assert_eq!(requests[2].data_id(), DataId::AsfFlags);
    assert_eq!(requests[3].data_id(), DataId::MaxTSet);

    assert_eq!(
        gateway.sink_ref().last_for("max_t_set"),
        Some(&Value::F32(80.0))
    );
}

// ============================================================================
// Auto-Update Scheduling
// ============================================================================

#[test]
fn test_auto_update_polls_due_entries_round_robin() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.add_auto_update_message(DataId::Tboiler, 2);
    config.add_auto_update_message(DataId::Tdhw, 2);
    let boiler = SimBoiler::with_points([
        (DataId::Tboiler, 0x2D80),
        (DataId::Tdhw, 0x3340),
    ]);
    let mut gateway = new_gateway(&config, boiler);

    // 30 s of idle ticks: both entries refresh, spaced by the 2 s guard.
    run_ticks(&mut gateway, 0, 300, 100);

    let polled: Vec<DataId> = gateway
        .boiler_mut()
        .unwrap()
        .requests()
        .iter()
        .map(|r| r.data_id())
        .collect();
    assert!(polled.contains(&DataId::Tboiler));
    assert!(polled.contains(&DataId::Tdhw));

    // The guard spaces gateway-originated exchanges at least 2 s apart,
    // so 30 s fits at most 15.
    assert!(polled.len() <= 15, "guard violated: {} polls", polled.len());

    assert_eq!(
        gateway.sink_ref().last_for("t_boiler"),
        Some(&Value::F32(45.5))
    );
    assert_eq!(
        gateway.sink_ref().last_for("t_dhw"),
        Some(&Value::F32(51.25))
    );
}

#[test]
fn test_auto_update_timeout_preserves_schedule_state() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.add_auto_update_message(DataId::Tboiler, 1);
    let mut boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
    boiler.fail_next(u32::MAX);
    let mut gateway = new_gateway(&config, boiler);

    run_ticks(&mut gateway, 0, 100, 100);

    // Attempts happened but nothing was published or latched, and the
    // entry's elapsed time kept growing.
    assert!(!gateway.boiler_mut().unwrap().requests().is_empty());
    assert!(gateway.sink_ref().events().is_empty());
    assert!(!gateway.status().status_received);
    assert!(gateway.auto_update().get(DataId::Tboiler).unwrap().elapsed_ms > 0);
}

#[test]
fn test_incidental_traffic_suppresses_scheduled_poll() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.add_auto_update_message(DataId::Tboiler, 5);
    let boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
    let mut gateway = new_gateway(&config, boiler);

    let mut now = 0u64;
    for _ in 0..120 {
        // The thermostat itself reads the boiler temperature every 4 s;
        // each relayed answer resets the auto-update entry.
        if now % 4000 == 0 {
            gateway
                .thermostat_mut()
                .push_request(Frame::build(MsgType::ReadData, DataId::Tboiler, 0));
        }
        gateway.tick(now);
        now += 100;
    }

    // Every boiler request came from the thermostat relay; the scheduler
    // never found the entry due.
    let scheduler_reads = gateway
        .boiler_mut()
        .unwrap()
        .requests()
        .len();
    assert_eq!(scheduler_reads, 3, "expected only the three relayed reads");
}

// ============================================================================
// Date Assembly
// ============================================================================

#[test]
fn test_composite_date_published_after_third_message() {
    init_logging();
    let boiler = SimBoiler::new();
    let mut gateway = new_gateway(&GatewayConfig::default(), boiler);

    // Feed the three date messages in arbitrary order via the relay path.
    gateway.handle_boiler_response(MsgType::ReadAck, DataId::Year, 2024);
    assert!(gateway.sink_ref().last_for("time_date").is_none());

    gateway.handle_boiler_response(MsgType::ReadAck, DataId::DayTime, (30 << 8) | 14);
    assert!(gateway.sink_ref().last_for("time_date").is_none());

    gateway.handle_boiler_response(MsgType::ReadAck, DataId::Date, (6 << 8) | 5);
    assert_eq!(
        gateway.sink_ref().last_for("time_date"),
        Some(&Value::Text("30:14 05/06/2024".to_string()))
    );

    // Same values again: no republish.
    let before = gateway.sink_ref().events().len();
    gateway.handle_boiler_response(MsgType::ReadAck, DataId::Date, (6 << 8) | 5);
    assert_eq!(gateway.sink_ref().events().len(), before);
}

// ============================================================================
// Scenario Runner
// ============================================================================

#[test]
fn test_demo_scenario_runs_clean() {
    init_logging();
    let mut config = GatewayConfig::default();
    config.add_initial_message(DataId::SConfigSMemberId);
    config.add_auto_update_message(DataId::Tboiler, 5);
    config.add_auto_update_message(DataId::Toutside, 10);

    let run = run_scenario(&config, &demo_scenario());

    let sink = run.gateway.sink_ref();
    assert_eq!(sink.last_for("t_boiler"), Some(&Value::F32(45.5)));
    assert_eq!(sink.last_for("t_outside"), Some(&Value::F32(8.5)));
    assert_eq!(
        sink.last_for("dhw_present"),
        Some(&Value::Text("ON".to_string()))
    );
    assert!(run.gateway.status().ch_enable);
    assert!(run.gateway.status().dhw_enable);
}
