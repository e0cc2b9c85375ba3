use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Battery pack of a drone configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyConfig {
    pub capacity: f64,
    pub number_of_batteries: u32,
}

impl EnergyConfig {
    pub fn total_capacity(&self) -> f64 {
        self.capacity * self.number_of_batteries as f64
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerticalSpeeds {
    pub ascension: f64,
    pub descent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    #[serde(default)]
    pub additional_load: f64,
}

/// Per-flight configuration of a drone: batteries, vertical speeds and the
/// payload it carries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneConfig {
    pub energy: EnergyConfig,
    #[serde(default)]
    pub vertical_speeds: Option<VerticalSpeeds>,
    #[serde(default)]
    pub payload: Option<Payload>,
}

impl DroneConfig {
    pub fn total_energy_capacity(&self) -> f64 {
        self.energy.total_capacity()
    }

    /// Extra load added by the payload, zero when flying without one.
    pub fn payload_load(&self) -> f64 {
        self.payload
            .as_ref()
            .map(|payload| payload.additional_load)
            .unwrap_or(0.0)
    }
}

/// Load factors of a drone in each flight phase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlightLoad {
    pub ascension: f64,
    pub translation: f64,
    pub descent: f64,
}

/// Descriptive drone record. Only the flight loads are read, by the energy
/// planner; everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drone {
    #[serde(default)]
    pub current_load_in_flight: Option<FlightLoad>,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl Drone {
    pub fn model(&self) -> Option<&str> {
        self.details
            .get("name")
            .or_else(|| self.details.get("model"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_capacity() {
        let energy = EnergyConfig {
            capacity: 75.5,
            number_of_batteries: 2,
        };
        assert_eq!(energy.total_capacity(), 151.0);
    }

    #[test]
    fn test_parse_config_without_payload() {
        let json = r#"{
            "energy": {"capacity": 100, "numberOfBatteries": 4},
            "verticalSpeeds": {"ascension": 2.5, "descent": 1.5},
            "camera": "unused"
        }"#;
        let config: DroneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.total_energy_capacity(), 400.0);
        assert_eq!(config.payload_load(), 0.0);
        assert_eq!(config.vertical_speeds.unwrap().descent, 1.5);
    }

    #[test]
    fn test_parse_config_with_payload() {
        let json = r#"{
            "energy": {"capacity": 50, "numberOfBatteries": 1},
            "payload": {"additionalLoad": 0.25}
        }"#;
        let config: DroneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.payload_load(), 0.25);
        assert!(config.vertical_speeds.is_none());
    }

    #[test]
    fn test_drone_keeps_descriptive_fields() {
        let json = r#"{
            "name": "md4-1000",
            "weight": 2.65,
            "currentLoadInFlight": {"ascension": 0.3, "translation": 0.2, "descent": 0.1}
        }"#;
        let drone: Drone = serde_json::from_str(json).unwrap();
        assert_eq!(drone.model(), Some("md4-1000"));
        assert_eq!(drone.current_load_in_flight.unwrap().translation, 0.2);
        assert!(drone.details.contains_key("weight"));
    }
}
