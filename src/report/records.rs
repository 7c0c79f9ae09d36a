//! JSON record types written into the output directory.
//!
//! Field names are part of the on-disk format consumed by downstream
//! tooling; the serde renames pin them independently of the Rust names.

use crate::core::constants::{GEO_INFO, OPC_INFO};
use crate::domain::{Classification, CxrClass, SeverityAssessment};
use serde::{Deserialize, Serialize};

/// The classification record written to `prediction-<tag>.json`.
///
/// Probabilities are serialized as strings, matching the historical format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    #[serde(rename = "**DISCLAIMER**")]
    pub disclaimer: String,
    pub prediction: String,
    #[serde(rename = "Normal")]
    pub normal: String,
    #[serde(rename = "Pneumonia")]
    pub pneumonia: String,
    #[serde(rename = "COVID-19")]
    pub covid19: String,
}

impl ClassificationRecord {
    pub fn new(classification: &Classification) -> Self {
        Self {
            disclaimer: classification.disclaimer().to_string(),
            prediction: classification.prediction.label().to_string(),
            normal: classification.probability(CxrClass::Normal).to_string(),
            pneumonia: classification.probability(CxrClass::Pneumonia).to_string(),
            covid19: classification.probability(CxrClass::Covid19).to_string(),
        }
    }
}

/// The severity record written to `severity.json` for positive predictions.
///
/// Scores are rounded to three decimals; the info fields carry fixed
/// explanations of the clinical extent scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeverityRecord {
    #[serde(rename = "Geographic severity")]
    pub geographic_severity: String,
    #[serde(rename = "Geographic extent score")]
    pub geographic_extent_score: String,
    #[serde(rename = "GeoInfo")]
    pub geo_info: String,
    #[serde(rename = "Opacity severity")]
    pub opacity_severity: String,
    #[serde(rename = "Opacity extent score")]
    pub opacity_extent_score: String,
    #[serde(rename = "OpcInfo")]
    pub opc_info: String,
}

impl SeverityRecord {
    pub fn new(severity: &SeverityAssessment) -> Self {
        Self {
            geographic_severity: format!("{:.3}", severity.geographic.severity),
            geographic_extent_score: format!("{:.3}", severity.geographic.extent_score),
            geo_info: GEO_INFO.to_string(),
            opacity_severity: format!("{:.3}", severity.opacity.severity),
            opacity_extent_score: format!("{:.3}", severity.opacity.extent_score),
            opc_info: OPC_INFO.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeverityScore;

    #[test]
    fn classification_record_uses_historical_field_names() {
        let classification = Classification::from_probabilities([0.2, 0.3, 0.5]);
        let record = ClassificationRecord::new(&classification);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"**DISCLAIMER**\""));
        assert!(json.contains("\"prediction\":\"COVID-19\""));
        assert!(json.contains("\"Normal\":\"0.2\""));
        assert!(json.contains("\"COVID-19\":\"0.5\""));
    }

    #[test]
    fn severity_record_rounds_to_three_decimals() {
        let severity = SeverityAssessment {
            geographic: SeverityScore {
                severity: 0.71666667,
                extent_score: 5.73333333,
            },
            opacity: SeverityScore {
                severity: 0.5,
                extent_score: 3.0,
            },
        };
        let record = SeverityRecord::new(&severity);

        assert_eq!(record.geographic_severity, "0.717");
        assert_eq!(record.geographic_extent_score, "5.733");
        assert_eq!(record.opacity_severity, "0.500");
        assert_eq!(record.opacity_extent_score, "3.000");

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"Geographic severity\""));
        assert!(json.contains("\"OpcInfo\""));
    }
}
