//! Placeholder substitution over the HTML report templates.

use crate::domain::CxrClass;
use crate::report::records::{ClassificationRecord, SeverityRecord};

/// Template used for COVID-19 positive reports.
pub const POSITIVE_TEMPLATE: &str = "pdf-covid-positive-template.html";

/// Template used for negative reports.
pub const NEGATIVE_TEMPLATE: &str = "pdf-covid-negative-template.html";

/// Selects the template variant for a predicted class.
pub fn template_for(class: CxrClass) -> &'static str {
    if class.is_positive() {
        POSITIVE_TEMPLATE
    } else {
        NEGATIVE_TEMPLATE
    }
}

/// Substitutes the placeholder tokens in a template with result values.
///
/// The severity tokens only exist in the positive template; passing
/// `None` for a negative report leaves nothing unresolved.
pub fn fill(
    template: &str,
    record: &ClassificationRecord,
    severity: Option<&SeverityRecord>,
    image_file: &str,
) -> String {
    let mut html = template
        .replace("${PREDICTION_CLASSIFICATION}", &record.prediction)
        .replace("${COVID-19}", &record.covid19)
        .replace("${NORMAL}", &record.normal)
        .replace("${PNEUMONIA}", &record.pneumonia)
        .replace("${X-RAY-IMAGE}", image_file);

    if let Some(severity) = severity {
        html = html
            .replace("${GEO_SEVERITY}", &severity.geographic_severity)
            .replace("${GEO_EXTENT_SCORE}", &severity.geographic_extent_score)
            .replace("${OPC_SEVERITY}", &severity.opacity_severity)
            .replace("${OPC_EXTENT_SCORE}", &severity.opacity_extent_score);
    }

    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{GEO_EXTENT_SCALE, OPC_EXTENT_SCALE};
    use crate::domain::{Classification, SeverityAssessment, SeverityScore};

    const ALL_TOKENS: &str = "\
        <p>${PREDICTION_CLASSIFICATION}</p>\
        <p>${COVID-19} ${NORMAL} ${PNEUMONIA}</p>\
        <img src=\"${X-RAY-IMAGE}\"/>\
        <p>${GEO_SEVERITY} / ${GEO_EXTENT_SCORE}</p>\
        <p>${OPC_SEVERITY} / ${OPC_EXTENT_SCORE}</p>";

    fn sample_severity() -> SeverityAssessment {
        SeverityAssessment {
            geographic: SeverityScore {
                severity: 0.717,
                extent_score: 0.717 * GEO_EXTENT_SCALE,
            },
            opacity: SeverityScore {
                severity: 0.42,
                extent_score: 0.42 * OPC_EXTENT_SCALE,
            },
        }
    }

    #[test]
    fn fill_resolves_every_token() {
        let classification = Classification::from_probabilities([0.1, 0.1, 0.8]);
        let record = ClassificationRecord::new(&classification);
        let severity = SeverityRecord::new(&sample_severity());

        let html = fill(ALL_TOKENS, &record, Some(&severity), "xray.png");
        assert!(!html.contains("${"), "unresolved tokens in: {html}");
        assert!(html.contains("COVID-19"));
        assert!(html.contains("xray.png"));
        assert!(html.contains("0.717"));
    }

    #[test]
    fn template_variant_follows_prediction() {
        assert_eq!(template_for(CxrClass::Covid19), POSITIVE_TEMPLATE);
        assert_eq!(template_for(CxrClass::Normal), NEGATIVE_TEMPLATE);
        assert_eq!(template_for(CxrClass::Pneumonia), NEGATIVE_TEMPLATE);
    }
}
