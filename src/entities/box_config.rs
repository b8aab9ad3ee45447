//! Box configuration - one authored junction box record

use serde::{Deserialize, Serialize};

/// Extra connector counts by position and conduit material
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorCounts {
    pub top_emt: u32,
    pub bottom_emt: u32,
    pub top_pvc: u32,
    pub bottom_pvc: u32,
    pub top_mc: u32,
    pub bottom_mc: u32,
}

impl ConnectorCounts {
    pub fn total(&self) -> u32 {
        self.top_emt
            + self.bottom_emt
            + self.top_pvc
            + self.bottom_pvc
            + self.top_mc
            + self.bottom_mc
    }
}

/// A junction box as described by a markup annotation or CSV row.
///
/// Field values are the authored strings (`"small"`, `"powered"`, `"round"`,
/// `"3/4\""`, `"adjustable"` ...); interpreting them is the encoder's job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxConfiguration {
    pub subject: String,
    pub box_type: String,
    pub box_size: String,
    pub gang: String,
    pub plaster_ring: String,
    pub entry_connector_type: String,
    pub connector_size: String,
    pub connectors: ConnectorCounts,
    pub bundle: String,
}

impl BoxConfiguration {
    /// Whether the subject marks this box as part of the fire alarm system
    pub fn is_fire_alarm(&self) -> bool {
        self.subject.to_lowercase().contains("fire alarm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_total() {
        let counts = ConnectorCounts {
            top_emt: 1,
            bottom_pvc: 2,
            top_mc: 1,
            ..Default::default()
        };
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_fire_alarm_subject() {
        let cfg = BoxConfiguration {
            subject: "P3 Box - Fire Alarm".to_string(),
            ..Default::default()
        };
        assert!(cfg.is_fire_alarm());
        assert!(!BoxConfiguration::default().is_fire_alarm());
    }
}
