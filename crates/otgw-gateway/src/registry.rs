//! Static message registry: data-id → payload shape(s) → publish targets.
//!
//! One identifier may fan out to several targets with different shapes —
//! a Status response carries seven slave flags in the low byte and five
//! master flags in the high byte; the fault-flags message carries a fault
//! code byte plus six individual fault flags. Identifiers without an
//! entry are "unhandled", which is a normal outcome, never an error.

use otgw_protocol::{payload, DataId};

use crate::publish::Value;

/// How to interpret (part of) a 16-bit payload for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Low-byte flag at the given bit, published as a boolean.
    FlagLb(u8),
    /// High-byte flag at the given bit, published as a boolean.
    FlagHb(u8),
    /// Low-byte flag rendered as "ON"/"OFF" text.
    FlagLbText(u8),
    /// High-byte flag rendered as "ON"/"OFF" text.
    FlagHbText(u8),
    /// Low byte, unsigned.
    U8Lb,
    /// High byte, unsigned.
    U8Hb,
    /// Low byte, signed.
    S8Lb,
    /// High byte, signed.
    S8Hb,
    /// Whole field, unsigned.
    U16,
    /// Whole field, signed.
    S16,
    /// Whole field as f8.8 fixed point.
    F88,
}

impl PayloadShape {
    /// Decode a payload into the value this shape publishes.
    pub fn decode(&self, data: u16) -> Value {
        match self {
            PayloadShape::FlagLb(bit) => Value::Bool(payload::parse_flag_lb(data, *bit)),
            PayloadShape::FlagHb(bit) => Value::Bool(payload::parse_flag_hb(data, *bit)),
            PayloadShape::FlagLbText(bit) => {
                Value::Text(payload::flag_text(payload::parse_flag_lb(data, *bit)).to_string())
            }
            PayloadShape::FlagHbText(bit) => {
                Value::Text(payload::flag_text(payload::parse_flag_hb(data, *bit)).to_string())
            }
            PayloadShape::U8Lb => Value::U8(payload::parse_u8_lb(data)),
            PayloadShape::U8Hb => Value::U8(payload::parse_u8_hb(data)),
            PayloadShape::S8Lb => Value::S8(payload::parse_s8_lb(data)),
            PayloadShape::S8Hb => Value::S8(payload::parse_s8_hb(data)),
            PayloadShape::U16 => Value::U16(payload::parse_u16(data)),
            PayloadShape::S16 => Value::S16(payload::parse_s16(data)),
            PayloadShape::F88 => Value::F32(payload::parse_f88(data)),
        }
    }
}

/// One shape → target binding within a message entry.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    /// How to decode the payload for this target.
    pub shape: PayloadShape,
    /// Target name the decoded value is published under.
    pub target: &'static str,
}

/// Registry entry for one data identifier.
#[derive(Debug, Clone, Copy)]
pub struct MessageSpec {
    /// The identifier this entry covers.
    pub id: DataId,
    /// Every target that receives a decoded value from this message.
    pub bindings: &'static [Binding],
}

const fn bind(shape: PayloadShape, target: &'static str) -> Binding {
    Binding { shape, target }
}

/// The registry table.
pub static REGISTRY: &[MessageSpec] = &[
    MessageSpec {
        id: DataId::Status,
        bindings: &[
            bind(PayloadShape::FlagLb(0), "fault_indication"),
            bind(PayloadShape::FlagLb(1), "ch_active"),
            bind(PayloadShape::FlagLb(2), "dhw_active"),
            bind(PayloadShape::FlagLb(3), "flame_on"),
            bind(PayloadShape::FlagLb(4), "cooling_active"),
            bind(PayloadShape::FlagLb(5), "ch2_active"),
            bind(PayloadShape::FlagLb(6), "diagnostic_indication"),
            bind(PayloadShape::FlagHb(0), "ch_enable"),
            bind(PayloadShape::FlagHb(1), "dhw_enable"),
            bind(PayloadShape::FlagHb(2), "cooling_enable"),
            bind(PayloadShape::FlagHb(3), "otc_active"),
            bind(PayloadShape::FlagHb(4), "ch2_enable"),
        ],
    },
    MessageSpec {
        id: DataId::AsfFlags,
        bindings: &[
            bind(PayloadShape::U8Lb, "fault_oem"),
            bind(PayloadShape::FlagHb(0), "fault_service"),
            bind(PayloadShape::FlagHb(1), "fault_lockout"),
            bind(PayloadShape::FlagHb(2), "fault_waterpress"),
            bind(PayloadShape::FlagHb(3), "fault_gasflame"),
            bind(PayloadShape::FlagHb(4), "fault_airpress"),
            bind(PayloadShape::FlagHb(5), "fault_watertemp"),
        ],
    },
    MessageSpec {
        id: DataId::SConfigSMemberId,
        bindings: &[
            bind(PayloadShape::U8Lb, "slave_memberid"),
            bind(PayloadShape::FlagHbText(0), "dhw_present"),
            bind(PayloadShape::FlagHbText(1), "control_type"),
            bind(PayloadShape::FlagHbText(2), "cooling_supported"),
            bind(PayloadShape::FlagHbText(3), "dhw_config"),
            bind(PayloadShape::FlagHbText(4), "lowoff_pumpcontrol_allowed"),
            bind(PayloadShape::FlagHbText(5), "ch2_present"),
        ],
    },
    MessageSpec {
        id: DataId::MConfigMMemberId,
        bindings: &[bind(PayloadShape::U8Lb, "master_memberid")],
    },
    MessageSpec {
        id: DataId::RemoteOverrideFunction,
        bindings: &[
            bind(PayloadShape::FlagLb(0), "func_manualoverridepriority"),
            bind(PayloadShape::FlagLb(1), "func_programoverridepriority"),
        ],
    },
    MessageSpec {
        id: DataId::TSet,
        bindings: &[bind(PayloadShape::F88, "t_set")],
    },
    MessageSpec {
        id: DataId::TsetCh2,
        bindings: &[bind(PayloadShape::F88, "t_set_ch2")],
    },
    MessageSpec {
        id: DataId::TrOverride,
        bindings: &[bind(PayloadShape::F88, "tr_override")],
    },
    MessageSpec {
        id: DataId::TdhwSet,
        bindings: &[bind(PayloadShape::F88, "t_set_dhw")],
    },
    MessageSpec {
        id: DataId::TrSet,
        bindings: &[bind(PayloadShape::F88, "t_roomset")],
    },
    MessageSpec {
        id: DataId::TrSetCh2,
        bindings: &[bind(PayloadShape::F88, "t_roomset_ch2")],
    },
    MessageSpec {
        id: DataId::RelModLevel,
        bindings: &[bind(PayloadShape::F88, "pc_relmod")],
    },
    MessageSpec {
        id: DataId::ChPressure,
        bindings: &[bind(PayloadShape::F88, "bar_chpress")],
    },
    MessageSpec {
        id: DataId::DhwFlowRate,
        bindings: &[bind(PayloadShape::F88, "ls_dhwflowrate")],
    },
    MessageSpec {
        id: DataId::Tr,
        bindings: &[bind(PayloadShape::F88, "t_room")],
    },
    MessageSpec {
        id: DataId::Tboiler,
        bindings: &[bind(PayloadShape::F88, "t_boiler")],
    },
    MessageSpec {
        id: DataId::Tdhw,
        bindings: &[bind(PayloadShape::F88, "t_dhw")],
    },
    MessageSpec {
        id: DataId::Toutside,
        bindings: &[bind(PayloadShape::F88, "t_outside")],
    },
    MessageSpec {
        id: DataId::Tret,
        bindings: &[bind(PayloadShape::F88, "t_ret")],
    },
    MessageSpec {
        id: DataId::Texhaust,
        bindings: &[bind(PayloadShape::S16, "t_exhaust")],
    },
    MessageSpec {
        id: DataId::TdhwSetBounds,
        bindings: &[
            bind(PayloadShape::S8Hb, "t_dhw_set_ub"),
            bind(PayloadShape::S8Lb, "t_dhw_set_lb"),
        ],
    },
    MessageSpec {
        id: DataId::MaxTSetBounds,
        bindings: &[
            bind(PayloadShape::S8Hb, "max_t_set_ub"),
            bind(PayloadShape::S8Lb, "max_t_set_lb"),
        ],
    },
    MessageSpec {
        id: DataId::MaxTSet,
        bindings: &[bind(PayloadShape::F88, "max_t_set")],
    },
    MessageSpec {
        id: DataId::BurnerStarts,
        bindings: &[bind(PayloadShape::U16, "nb_startburner")],
    },
    MessageSpec {
        id: DataId::ChPumpStarts,
        bindings: &[bind(PayloadShape::U16, "nb_startchpump")],
    },
    MessageSpec {
        id: DataId::DhwPumpValveStarts,
        bindings: &[bind(PayloadShape::U16, "nb_startdhwpump")],
    },
    MessageSpec {
        id: DataId::BurnerOperationHours,
        bindings: &[bind(PayloadShape::U16, "nb_burnerhours")],
    },
    MessageSpec {
        id: DataId::ChPumpOperationHours,
        bindings: &[bind(PayloadShape::U16, "nb_chpumphours")],
    },
    MessageSpec {
        id: DataId::DhwPumpValveOperationHours,
        bindings: &[bind(PayloadShape::U16, "nb_dhwpumphours")],
    },
    MessageSpec {
        id: DataId::DhwBurnerOperationHours,
        bindings: &[bind(PayloadShape::U16, "nb_dhwburnerhours")],
    },
    MessageSpec {
        id: DataId::OemDiagnosticCode,
        bindings: &[bind(PayloadShape::U16, "diag_oem")],
    },
    MessageSpec {
        id: DataId::OtVersionMaster,
        bindings: &[bind(PayloadShape::F88, "master_ot_version")],
    },
    MessageSpec {
        id: DataId::OtVersionSlave,
        bindings: &[bind(PayloadShape::F88, "slave_ot_version")],
    },
];

/// Find the registry entry for an identifier, if any.
pub fn lookup(id: DataId) -> Option<&'static MessageSpec> {
    REGISTRY.iter().find(|spec| spec.id == id)
}
