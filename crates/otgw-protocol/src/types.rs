//! Common protocol types: message types, data identifiers and link states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// OpenTherm message type, carried in frame bits 28..=30.
///
/// Requests carry READ-DATA or WRITE-DATA; responses carry READ-ACK,
/// WRITE-ACK, DATA-INVALID or UNKNOWN-DATAID. The 3-bit field covers all
/// eight values, so conversion from raw bits is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgType {
    /// Master read request.
    ReadData,
    /// Master write request.
    WriteData,
    /// Master invalid-data notification.
    InvalidData,
    /// Reserved encoding.
    Reserved,
    /// Slave read acknowledgement.
    ReadAck,
    /// Slave write acknowledgement.
    WriteAck,
    /// Slave data-invalid reply.
    DataInvalid,
    /// Slave does not know the requested data-id.
    UnknownDataId,
}

impl MsgType {
    /// Whether this is a master-originated request type.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            MsgType::ReadData | MsgType::WriteData | MsgType::InvalidData
        )
    }

    /// Whether this is a slave acknowledgement.
    pub fn is_ack(&self) -> bool {
        matches!(self, MsgType::ReadAck | MsgType::WriteAck)
    }
}

impl From<u8> for MsgType {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0 => MsgType::ReadData,
            1 => MsgType::WriteData,
            2 => MsgType::InvalidData,
            3 => MsgType::Reserved,
            4 => MsgType::ReadAck,
            5 => MsgType::WriteAck,
            6 => MsgType::DataInvalid,
            _ => MsgType::UnknownDataId,
        }
    }
}

impl From<MsgType> for u8 {
    fn from(value: MsgType) -> Self {
        match value {
            MsgType::ReadData => 0,
            MsgType::WriteData => 1,
            MsgType::InvalidData => 2,
            MsgType::Reserved => 3,
            MsgType::ReadAck => 4,
            MsgType::WriteAck => 5,
            MsgType::DataInvalid => 6,
            MsgType::UnknownDataId => 7,
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MsgType::ReadData => "READ_DATA",
            MsgType::WriteData => "WRITE_DATA",
            MsgType::InvalidData => "INVALID_DATA",
            MsgType::Reserved => "RESERVED",
            MsgType::ReadAck => "READ_ACK",
            MsgType::WriteAck => "WRITE_ACK",
            MsgType::DataInvalid => "DATA_INVALID",
            MsgType::UnknownDataId => "UNKNOWN_DATAID",
        };
        write!(f, "{}", name)
    }
}

/// OpenTherm data identifier, carried in frame bits 16..=23.
///
/// Selects the semantic meaning of the frame's 16-bit data field. Values
/// the gateway does not know are mapped to [`DataId::Unknown`] and must be
/// handled without failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataId {
    /// Master and slave status flags.
    Status,
    /// Control setpoint: CH water temperature setpoint.
    TSet,
    /// Master configuration flags and member-id code.
    MConfigMMemberId,
    /// Slave configuration flags and member-id code.
    SConfigSMemberId,
    /// Remote command.
    Command,
    /// Application-specific fault flags and OEM fault code.
    AsfFlags,
    /// Remote-parameter flags.
    RbpFlags,
    /// Cooling control signal.
    CoolingControl,
    /// Control setpoint for the second CH circuit.
    TsetCh2,
    /// Remote override room setpoint.
    TrOverride,
    /// Number of transparent slave parameters.
    Tsp,
    /// Transparent slave parameter index and value.
    TspEntry,
    /// Size of the fault history buffer.
    FhbSize,
    /// Fault history buffer index and value.
    FhbEntry,
    /// Maximum relative modulation level setting.
    MaxRelModLevelSetting,
    /// Maximum boiler capacity and minimum modulation level.
    MaxCapacityMinModLevel,
    /// Room setpoint.
    TrSet,
    /// Relative modulation level.
    RelModLevel,
    /// CH water pressure.
    ChPressure,
    /// DHW flow rate.
    DhwFlowRate,
    /// Day of week and time of day.
    DayTime,
    /// Calendar date.
    Date,
    /// Calendar year.
    Year,
    /// Room setpoint for the second CH circuit.
    TrSetCh2,
    /// Room temperature.
    Tr,
    /// Boiler flow water temperature.
    Tboiler,
    /// DHW temperature.
    Tdhw,
    /// Outside temperature.
    Toutside,
    /// Return water temperature.
    Tret,
    /// Solar storage temperature.
    Tstorage,
    /// Solar collector temperature.
    Tcollector,
    /// Flow water temperature of the second CH circuit.
    TflowCh2,
    /// Second DHW temperature.
    Tdhw2,
    /// Exhaust temperature.
    Texhaust,
    /// Upper/lower bounds for the DHW setpoint.
    TdhwSetBounds,
    /// Upper/lower bounds for the max CH setpoint.
    MaxTSetBounds,
    /// Upper/lower bounds for the OTC heat-curve ratio.
    HcratioBounds,
    /// DHW setpoint.
    TdhwSet,
    /// Maximum allowable CH water setpoint.
    MaxTSet,
    /// OTC heat-curve ratio.
    Hcratio,
    /// Remote override function flags.
    RemoteOverrideFunction,
    /// OEM-specific diagnostic code.
    OemDiagnosticCode,
    /// Number of burner starts.
    BurnerStarts,
    /// Number of CH pump starts.
    ChPumpStarts,
    /// Number of DHW pump/valve starts.
    DhwPumpValveStarts,
    /// Number of burner starts in DHW mode.
    DhwBurnerStarts,
    /// Burner operation hours.
    BurnerOperationHours,
    /// CH pump operation hours.
    ChPumpOperationHours,
    /// DHW pump/valve operation hours.
    DhwPumpValveOperationHours,
    /// DHW burner operation hours.
    DhwBurnerOperationHours,
    /// OpenTherm protocol version of the master.
    OtVersionMaster,
    /// OpenTherm protocol version of the slave.
    OtVersionSlave,
    /// Master product version.
    MasterVersion,
    /// Slave product version.
    SlaveVersion,
    /// Any identifier the gateway has no entry for.
    Unknown(u8),
}

/// Table mapping known identifiers to their wire value and symbolic name.
const DATA_IDS: &[(DataId, u8, &str)] = &[
    (DataId::Status, 0, "Status"),
    (DataId::TSet, 1, "TSet"),
    (DataId::MConfigMMemberId, 2, "MConfigMMemberId"),
    (DataId::SConfigSMemberId, 3, "SConfigSMemberId"),
    (DataId::Command, 4, "Command"),
    (DataId::AsfFlags, 5, "AsfFlags"),
    (DataId::RbpFlags, 6, "RbpFlags"),
    (DataId::CoolingControl, 7, "CoolingControl"),
    (DataId::TsetCh2, 8, "TsetCh2"),
    (DataId::TrOverride, 9, "TrOverride"),
    (DataId::Tsp, 10, "Tsp"),
    (DataId::TspEntry, 11, "TspEntry"),
    (DataId::FhbSize, 12, "FhbSize"),
    (DataId::FhbEntry, 13, "FhbEntry"),
    (DataId::MaxRelModLevelSetting, 14, "MaxRelModLevelSetting"),
    (DataId::MaxCapacityMinModLevel, 15, "MaxCapacityMinModLevel"),
    (DataId::TrSet, 16, "TrSet"),
    (DataId::RelModLevel, 17, "RelModLevel"),
    (DataId::ChPressure, 18, "ChPressure"),
    (DataId::DhwFlowRate, 19, "DhwFlowRate"),
    (DataId::DayTime, 20, "DayTime"),
    (DataId::Date, 21, "Date"),
    (DataId::Year, 22, "Year"),
    (DataId::TrSetCh2, 23, "TrSetCh2"),
    (DataId::Tr, 24, "Tr"),
    (DataId::Tboiler, 25, "Tboiler"),
    (DataId::Tdhw, 26, "Tdhw"),
    (DataId::Toutside, 27, "Toutside"),
    (DataId::Tret, 28, "Tret"),
    (DataId::Tstorage, 29, "Tstorage"),
    (DataId::Tcollector, 30, "Tcollector"),
    (DataId::TflowCh2, 31, "TflowCh2"),
    (DataId::Tdhw2, 32, "Tdhw2"),
    (DataId::Texhaust, 33, "Texhaust"),
    (DataId::TdhwSetBounds, 48, "TdhwSetBounds"),
    (DataId::MaxTSetBounds, 49, "MaxTSetBounds"),
    (DataId::HcratioBounds, 50, "HcratioBounds"),
    (DataId::TdhwSet, 56, "TdhwSet"),
    (DataId::MaxTSet, 57, "MaxTSet"),
    (DataId::Hcratio, 58, "Hcratio"),
    (DataId::RemoteOverrideFunction, 100, "RemoteOverrideFunction"),
    (DataId::OemDiagnosticCode, 115, "OemDiagnosticCode"),
    (DataId::BurnerStarts, 116, "BurnerStarts"),
    (DataId::ChPumpStarts, 117, "ChPumpStarts"),
    (DataId::DhwPumpValveStarts, 118, "DhwPumpValveStarts"),
    (DataId::DhwBurnerStarts, 119, "DhwBurnerStarts"),
    (DataId::BurnerOperationHours, 120, "BurnerOperationHours"),
    (DataId::ChPumpOperationHours, 121, "ChPumpOperationHours"),
    (
        DataId::DhwPumpValveOperationHours,
        122,
        "DhwPumpValveOperationHours",
    ),
    (DataId::DhwBurnerOperationHours, 123, "DhwBurnerOperationHours"),
    (DataId::OtVersionMaster, 124, "OtVersionMaster"),
    (DataId::OtVersionSlave, 125, "OtVersionSlave"),
    (DataId::MasterVersion, 126, "MasterVersion"),
    (DataId::SlaveVersion, 127, "SlaveVersion"),
];

impl From<u8> for DataId {
    fn from(value: u8) -> Self {
        DATA_IDS
            .iter()
            .find(|(_, wire, _)| *wire == value)
            .map(|(id, _, _)| *id)
            .unwrap_or(DataId::Unknown(value))
    }
}

impl From<DataId> for u8 {
    fn from(value: DataId) -> Self {
        if let DataId::Unknown(raw) = value {
            return raw;
        }
        DATA_IDS
            .iter()
            .find(|(id, _, _)| *id == value)
            .map(|(_, wire, _)| *wire)
            .unwrap_or(0)
    }
}

impl FromStr for DataId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DATA_IDS
            .iter()
            .find(|(_, _, name)| *name == s)
            .map(|(id, _, _)| *id)
            .ok_or_else(|| ProtocolError::UnknownDataId(s.to_string()))
    }
}

impl fmt::Display for DataId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let DataId::Unknown(raw) = self {
            return write!(f, "Unknown({})", raw);
        }
        let name = DATA_IDS
            .iter()
            .find(|(id, _, _)| id == self)
            .map(|(_, _, name)| *name)
            .unwrap_or("?");
        write!(f, "{}", name)
    }
}

/// Decode status reported by the bus driver for a received request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxStatus {
    /// No message.
    None,
    /// Message received and decoded correctly.
    Success,
    /// Message received but malformed.
    Invalid,
    /// The bounded wait for a message expired.
    Timeout,
}

/// State of one side of the bus as reported by its driver.
///
/// Only [`LinkState::Ready`] and [`LinkState::Delay`] matter to the
/// scheduling logic; the remaining states exist so drivers can report
/// their full transfer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Driver not started.
    NotInitialized,
    /// Idle and able to start an exchange.
    Ready,
    /// In the mandatory inter-message delay window.
    Delay,
    /// Transmitting a request.
    RequestSending,
    /// Waiting for a response.
    ResponseWaiting,
    /// A response is buffered.
    ResponseReady,
    /// The buffered response failed validation.
    ResponseInvalid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_type_roundtrip() {
        for raw in 0u8..8 {
            let msg_type = MsgType::from(raw);
            assert_eq!(u8::from(msg_type), raw);
        }
    }

    #[test]
    fn test_msg_type_masks_high_bits() {
        assert_eq!(MsgType::from(0x08), MsgType::ReadData);
        assert_eq!(MsgType::from(0xFF), MsgType::UnknownDataId);
    }

    #[test]
    fn test_data_id_wire_roundtrip() {
        for (id, wire, _) in DATA_IDS {
            assert_eq!(DataId::from(*wire), *id);
            assert_eq!(u8::from(*id), *wire);
        }
    }

    #[test]
    fn test_data_id_unknown_preserves_raw() {
        let id = DataId::from(99);
        assert_eq!(id, DataId::Unknown(99));
        assert_eq!(u8::from(id), 99);
    }

    #[test]
    fn test_data_id_from_name() {
        assert_eq!("Tboiler".parse::<DataId>().unwrap(), DataId::Tboiler);
        assert_eq!("Status".parse::<DataId>().unwrap(), DataId::Status);
        assert!(matches!(
            "NoSuchMessage".parse::<DataId>(),
            Err(ProtocolError::UnknownDataId(_))
        ));
    }

    #[test]
    fn test_data_id_display() {
        assert_eq!(DataId::TdhwSet.to_string(), "TdhwSet");
        assert_eq!(DataId::Unknown(42).to_string(), "Unknown(42)");
    }
}
