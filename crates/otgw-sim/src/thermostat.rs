//! Simulated thermostat-side link.

use std::collections::VecDeque;

use otgw_gateway::BusLink;
use otgw_protocol::{DataId, Frame, LinkState, MsgType, RxStatus};

/// A scripted thermostat behind the slave-side bus link.
///
/// Requests are queued ahead of time and handed to the gateway one per
/// [`BusLink::poll`]; responses the gateway relays back are recorded.
/// The reported state defaults to [`LinkState::Delay`], the idle window
/// in which the scheduler may use the bus.
pub struct SimThermostat {
    pending: VecDeque<(Frame, RxStatus)>,
    state: LinkState,
    responses: Vec<Frame>,
}

impl Default for SimThermostat {
    fn default() -> Self {
        Self::new()
    }
}

impl SimThermostat {
    /// Create an idle thermostat with an empty script.
    pub fn new() -> Self {
        SimThermostat {
            pending: VecDeque::new(),
            state: LinkState::Delay,
            responses: Vec::new(),
        }
    }

    /// Queue a well-formed request.
    pub fn push_request(&mut self, frame: Frame) {
        self.pending.push_back((frame, RxStatus::Success));
    }

    /// Queue a request with an explicit decode status, for fault cases.
    pub fn push_with_status(&mut self, frame: Frame, rx: RxStatus) {
        self.pending.push_back((frame, rx));
    }

    /// Force the reported link state.
    pub fn set_state(&mut self, state: LinkState) {
        self.state = state;
    }

    /// Every response the gateway relayed back, in order.
    pub fn responses(&self) -> &[Frame] {
        &self.responses
    }
}

impl BusLink for SimThermostat {
    fn send_request(&mut self, _request: Frame) -> Frame {
        // The gateway is the slave on this side; it never originates
        // requests toward the thermostat.
        Frame::NULL
    }

    fn send_response(&mut self, response: Frame) {
        self.responses.push(response);
    }

    fn build_request(&self, msg_type: MsgType, data_id: DataId, data: u16) -> Frame {
        Frame::build(msg_type, data_id, data)
    }

    fn poll(&mut self) -> Option<(Frame, RxStatus)> {
        self.pending.pop_front()
    }

    fn state(&self) -> LinkState {
        self.state
    }
}
