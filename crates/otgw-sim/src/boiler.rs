//! Simulated boiler-side link.

use std::collections::HashMap;

use otgw_gateway::BusLink;
use otgw_protocol::{DataId, Frame, LinkState, MsgType, RxStatus};

/// A boiler model behind the master-side bus link.
///
/// Read requests are answered with READ-ACK from a table of data points
/// (UNKNOWN-DATAID for absent points); write requests store the payload
/// and answer WRITE-ACK. Failures can be injected to model a dead or
/// flaky bus: a failed exchange returns the null frame, exactly as the
/// real driver reports a timeout.
pub struct SimBoiler {
    points: HashMap<DataId, u16>,
    state: LinkState,
    fail_remaining: u32,
    requests: Vec<Frame>,
}

impl Default for SimBoiler {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoiler {
    /// Create a ready boiler with no data points.
    pub fn new() -> Self {
        SimBoiler {
            points: HashMap::new(),
            state: LinkState::Ready,
            fail_remaining: 0,
            requests: Vec::new(),
        }
    }

    /// Create a boiler with an initial set of data points.
    pub fn with_points(points: impl IntoIterator<Item = (DataId, u16)>) -> Self {
        SimBoiler {
            points: points.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Set or replace one data point.
    pub fn set_point(&mut self, id: DataId, data: u16) {
        self.points.insert(id, data);
    }

    /// Current value of one data point.
    pub fn point(&self, id: DataId) -> Option<u16> {
        self.points.get(&id).copied()
    }

    /// Make the next `count` exchanges fail with a null response.
    pub fn fail_next(&mut self, count: u32) {
        self.fail_remaining = count;
    }

    /// Force the reported link state.
    pub fn set_state(&mut self, state: LinkState) {
        self.state = state;
    }

    /// Every request frame received so far, in order.
    pub fn requests(&self) -> &[Frame] {
        &self.requests
    }
}

impl BusLink for SimBoiler {
    fn send_request(&mut self, request: Frame) -> Frame {
        self.requests.push(request);
        if request.is_null() {
            return Frame::NULL;
        }
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            log::trace!("sim boiler: injected failure for {}", request.data_id());
            return Frame::NULL;
        }

        let data_id = request.data_id();
        match request.msg_type() {
            MsgType::ReadData => match self.points.get(&data_id) {
                Some(&data) => Frame::build(MsgType::ReadAck, data_id, data),
                None => Frame::build(MsgType::UnknownDataId, data_id, 0),
            },
            MsgType::WriteData => {
                let stored = if data_id == DataId::Status {
                    // Master flags land in the high byte; the slave's own
                    // low-byte status is preserved.
                    let slave = self.points.get(&data_id).copied().unwrap_or(0) & 0x00FF;
                    (request.payload() & 0xFF00) | slave
                } else {
                    request.payload()
                };
                self.points.insert(data_id, stored);
                Frame::build(MsgType::WriteAck, data_id, stored)
            }
            _ => Frame::build(MsgType::DataInvalid, data_id, 0),
        }
    }

    fn send_response(&mut self, _response: Frame) {
        // The gateway is the master on this side; it never answers the boiler.
    }

    fn build_request(&self, msg_type: MsgType, data_id: DataId, data: u16) -> Frame {
        Frame::build(msg_type, data_id, data)
    }

    fn poll(&mut self) -> Option<(Frame, RxStatus)> {
        None
    }

    fn state(&self) -> LinkState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_known_point() {
        let mut boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
        let response =
            boiler.send_request(Frame::build(MsgType::ReadData, DataId::Tboiler, 0));
        assert_eq!(response.msg_type(), MsgType::ReadAck);
        assert_eq!(response.payload(), 0x2D80);
    }

    #[test]
    fn test_read_unknown_point() {
        let mut boiler = SimBoiler::new();
        let response =
            boiler.send_request(Frame::build(MsgType::ReadData, DataId::Tboiler, 0));
        assert_eq!(response.msg_type(), MsgType::UnknownDataId);
    }

    #[test]
    fn test_write_stores_and_acks() {
        let mut boiler = SimBoiler::new();
        let response =
            boiler.send_request(Frame::build(MsgType::WriteData, DataId::TSet, 0x1580));
        assert_eq!(response.msg_type(), MsgType::WriteAck);
        assert_eq!(boiler.point(DataId::TSet), Some(0x1580));
    }

    #[test]
    fn test_status_write_preserves_slave_byte() {
        let mut boiler = SimBoiler::with_points([(DataId::Status, 0x000A)]);
        let response =
            boiler.send_request(Frame::build(MsgType::WriteData, DataId::Status, 0x0100));
        assert_eq!(response.payload(), 0x010A);
        assert_eq!(boiler.point(DataId::Status), Some(0x010A));
    }

    #[test]
    fn test_injected_failures() {
        let mut boiler = SimBoiler::with_points([(DataId::Tboiler, 0x2D80)]);
        boiler.fail_next(2);
        let request = Frame::build(MsgType::ReadData, DataId::Tboiler, 0);
        assert!(boiler.send_request(request).is_null());
        assert!(boiler.send_request(request).is_null());
        assert!(!boiler.send_request(request).is_null());
    }
}
