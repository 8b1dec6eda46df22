//! The bus-link boundary.
//!
//! The gateway drives two physical OpenTherm interfaces: the
//! thermostat-facing side (where the gateway acts as the slave) and the
//! boiler-facing side (where it acts as the master). Both sit behind
//! [`BusLink`]; the electrical layer, Manchester bit timing and checksum
//! handling live entirely in the driver implementing it.

use otgw_protocol::{DataId, Frame, LinkState, MsgType, RxStatus};

/// One side of the OpenTherm bus.
///
/// `send_request` is a synchronous exchange with a bounded wait owned by
/// the driver: it returns the decoded response frame, or [`Frame::NULL`]
/// on timeout or transmission failure. The engine treats a null response
/// as "try again next opportunity" and never blocks on the link itself.
pub trait BusLink {
    /// Send a request and wait for the response. Null = no/failed reply.
    fn send_request(&mut self, request: Frame) -> Frame;

    /// Send a response frame back to the master on this side of the bus.
    fn send_response(&mut self, response: Frame);

    /// Assemble a frame with this driver's framing (parity included).
    fn build_request(&self, msg_type: MsgType, data_id: DataId, payload: u16) -> Frame;

    /// Pump reception; `Some` when a request arrived since the last poll.
    fn poll(&mut self) -> Option<(Frame, RxStatus)>;

    /// Current driver state.
    fn state(&self) -> LinkState;

    /// Whether the driver can start an exchange right now.
    fn is_ready(&self) -> bool {
        self.state() == LinkState::Ready
    }
}
