use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel serial number for aircraft whose registry entry had none
pub const UNKNOWN_SERIAL: &str = "UNKNOWN";

const REGISTRY_MODEL_KEY: &str = "model";
const REGISTRY_SERIAL_KEY: &str = "serialNumber";

/// Flat attribute map returned by the aircraft registry lookup
pub type RegistryAttributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftIdentity {
    pub serial_number: String,
    pub model: String,
}

impl AircraftIdentity {
    pub fn new(serial_number: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            serial_number: serial_number.into(),
            model: model.into(),
        }
    }

    /// Resolve an identity from registry attributes.
    /// Blank or missing serial numbers become [`UNKNOWN_SERIAL`].
    pub fn from_registry(attributes: &RegistryAttributes) -> Self {
        let serial_number = attributes
            .get(REGISTRY_SERIAL_KEY)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SERIAL)
            .to_string();

        let model = attributes
            .get(REGISTRY_MODEL_KEY)
            .map(|m| m.trim().to_string())
            .unwrap_or_default();

        Self {
            serial_number,
            model,
        }
    }

    pub fn has_known_serial(&self) -> bool {
        let serial = self.serial_number.trim();
        !serial.is_empty() && !serial.eq_ignore_ascii_case(UNKNOWN_SERIAL)
    }
}

/// How the defect reports behind an analysis were matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    TailNumber,
    ModelFallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_registry() {
        let mut attributes = RegistryAttributes::new();
        attributes.insert("model".to_string(), " 172N ".to_string());
        attributes.insert("serialNumber".to_string(), "17269462".to_string());
        attributes.insert("Registrant".to_string(), "JOHN DOE".to_string());

        let identity = AircraftIdentity::from_registry(&attributes);
        assert_eq!(identity.model, "172N");
        assert_eq!(identity.serial_number, "17269462");
        assert!(identity.has_known_serial());
    }

    #[test]
    fn test_missing_serial_is_unknown() {
        let mut attributes = RegistryAttributes::new();
        attributes.insert("serialNumber".to_string(), "  ".to_string());

        let identity = AircraftIdentity::from_registry(&attributes);
        assert_eq!(identity.serial_number, UNKNOWN_SERIAL);
        assert!(!identity.has_known_serial());
        assert_eq!(identity.model, "");
    }

    #[test]
    fn test_unknown_sentinel_is_case_insensitive() {
        assert!(!AircraftIdentity::new("unknown", "172S").has_known_serial());
        assert!(AircraftIdentity::new("172S8001", "172S").has_known_serial());
    }
}
