//! Gateway-side state latched from boiler responses: the status flag
//! latches, the gating logic for outgoing status requests, and the
//! incrementally assembled date/time.

use otgw_protocol::payload;

/// Master status flags latched from the most recent Status response.
///
/// Updated only by decoding a Status-type response; never reset except at
/// gateway restart. `status_received` gates the initialization sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewayStatus {
    /// Central heating enabled.
    pub ch_enable: bool,
    /// Domestic hot water enabled.
    pub dhw_enable: bool,
    /// Cooling enabled.
    pub cooling_enable: bool,
    /// Outside temperature compensation active.
    pub otc_active: bool,
    /// Second CH circuit enabled.
    pub ch2_active: bool,
    /// At least one Status response has been decoded.
    pub status_received: bool,
}

impl GatewayStatus {
    /// Latch the five master flags from a Status response payload.
    pub fn update_from(&mut self, data: u16) {
        self.ch_enable = payload::parse_flag_hb(data, 0);
        self.dhw_enable = payload::parse_flag_hb(data, 1);
        self.cooling_enable = payload::parse_flag_hb(data, 2);
        self.otc_active = payload::parse_flag_hb(data, 3);
        self.ch2_active = payload::parse_flag_hb(data, 4);
        self.status_received = true;
    }
}

/// Externally configured gating for outgoing Status requests.
///
/// When the gateway originates a Status request, each enable flag is the
/// AND of the latched state, the corresponding switch here, and (for CH,
/// cooling and CH2) a positive setpoint. This is a safety interlock: a
/// request built by the gateway must never assert heating that the
/// configured setpoints do not back.
#[derive(Debug, Clone, Copy)]
pub struct StatusGates {
    /// Permit CH enable.
    pub ch_enable: bool,
    /// Permit DHW enable.
    pub dhw_enable: bool,
    /// Permit cooling enable.
    pub cooling_enable: bool,
    /// Permit OTC active.
    pub otc_active: bool,
    /// Permit CH2 enable.
    pub ch2_active: bool,
    /// CH supply setpoint; CH is gated on a positive value when set.
    pub ch_setpoint: Option<f32>,
    /// Cooling control signal; cooling is gated on a positive value when set.
    pub cooling_control: Option<f32>,
    /// CH2 supply setpoint; CH2 is gated on a positive value when set.
    pub ch2_setpoint: Option<f32>,
}

impl Default for StatusGates {
    fn default() -> Self {
        StatusGates {
            ch_enable: true,
            dhw_enable: true,
            cooling_enable: true,
            otc_active: true,
            ch2_active: true,
            ch_setpoint: None,
            cooling_control: None,
            ch2_setpoint: None,
        }
    }
}

impl StatusGates {
    /// Build the high-byte payload of a gateway-originated Status request.
    pub fn gated_payload(&self, latch: &GatewayStatus) -> u16 {
        let permits = |setpoint: Option<f32>| setpoint.map_or(true, |v| v > 0.0);

        let ch = latch.ch_enable && self.ch_enable && permits(self.ch_setpoint);
        let dhw = latch.dhw_enable && self.dhw_enable;
        let cooling =
            latch.cooling_enable && self.cooling_enable && permits(self.cooling_control);
        let otc = latch.otc_active && self.otc_active;
        let ch2 = latch.ch2_active && self.ch2_active && permits(self.ch2_setpoint);

        let mut data = 0u16;
        data = payload::write_flag_hb(0, ch, data);
        data = payload::write_flag_hb(1, dhw, data);
        data = payload::write_flag_hb(2, cooling, data);
        data = payload::write_flag_hb(3, otc, data);
        data = payload::write_flag_hb(4, ch2, data);
        data
    }
}

const UNSET_BYTE: u8 = 0xFF;
const UNSET_YEAR: u16 = 0xFFFF;

/// Incrementally assembled date/time from the DayTime, Date and Year
/// messages.
///
/// Fields start at a sentinel "unset" value; the composite string is
/// produced only once every field has been seen, and again only when the
/// formatted text actually changes.
#[derive(Debug, Clone)]
pub struct DateAccumulator {
    minute: u8,
    hour: u8,
    day_of_week: u8,
    day: u8,
    month: u8,
    year: u16,
    last_published: String,
}

impl Default for DateAccumulator {
    fn default() -> Self {
        DateAccumulator {
            minute: UNSET_BYTE,
            hour: UNSET_BYTE,
            day_of_week: UNSET_BYTE,
            day: UNSET_BYTE,
            month: UNSET_BYTE,
            year: UNSET_YEAR,
            last_published: String::new(),
        }
    }
}

impl DateAccumulator {
    /// Absorb a DayTime payload: hour in the low byte, minute in high-byte
    /// bits 0..=4, day-of-week in bits 13..=14.
    pub fn set_day_time(&mut self, data: u16) {
        self.day_of_week = ((data >> 13) & 0x03) as u8;
        self.hour = payload::parse_u8_lb(data);
        self.minute = ((data >> 8) & 0x1F) as u8;
    }

    /// Absorb a Date payload: day in the low byte, month in the high byte.
    pub fn set_date(&mut self, data: u16) {
        self.month = payload::parse_u8_hb(data);
        self.day = payload::parse_u8_lb(data);
    }

    /// Absorb a Year payload.
    pub fn set_year(&mut self, data: u16) {
        self.year = data;
    }

    /// Whether every published field has been seen.
    pub fn is_complete(&self) -> bool {
        self.minute != UNSET_BYTE
            && self.hour != UNSET_BYTE
            && self.day != UNSET_BYTE
            && self.month != UNSET_BYTE
            && self.year != UNSET_YEAR
    }

    /// The composite string, when complete and different from the last
    /// one returned. Updates the change tracker on success.
    pub fn take_publish(&mut self) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        let formatted = format!(
            "{:02}:{:02} {:02}/{:02}/{:04}",
            self.minute, self.hour, self.day, self.month, self.year
        );
        if formatted == self.last_published {
            return None;
        }
        self.last_published = formatted.clone();
        Some(formatted)
    }
}
