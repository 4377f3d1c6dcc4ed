use crate::types::scoring::{clamp_score, DimensionScore, ReadinessLevel, Score};

/// Weighted mean over the dimensions that ran; 0 when none did.
pub fn overall_score<'a>(scores: impl IntoIterator<Item = &'a DimensionScore>) -> Score {
    let (weighted, weights) = scores
        .into_iter()
        .fold((0.0, 0.0), |(weighted, weights), dimension_score| {
            let weight = dimension_score.dimension.weight();
            (weighted + dimension_score.score * weight, weights + weight)
        });
    if weights > 0.0 {
        clamp_score(weighted / weights)
    } else {
        0.0
    }
}

pub fn executive_recommendation(level: ReadinessLevel, critical_count: usize) -> String {
    match level {
        ReadinessLevel::ProductionReady => {
            "System is production-ready. Minor improvements recommended for optimization."
                .to_string()
        }
        ReadinessLevel::NearlyReady => format!(
            "Address {critical_count} critical issues before production deployment. Target timeline: 1-2 weeks."
        ),
        ReadinessLevel::SignificantWorkNeeded => {
            "Significant work required. Focus on security and reliability first. Target timeline: 1 month."
                .to_string()
        }
        ReadinessLevel::NotReady => {
            "Major remediation required. Consider phased approach with security as priority."
                .to_string()
        }
        ReadinessLevel::SubstantialRebuildRequired => {
            "Substantial rebuild recommended. Stabilize security and reliability foundations before any production exposure."
                .to_string()
        }
    }
}

pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::finding::Dimension;

    fn score(dimension: Dimension, value: Score) -> DimensionScore {
        DimensionScore::neutral(dimension, value, "", &[])
    }

    #[test]
    fn overall_score_weights_each_dimension() {
        let scores = [
            score(Dimension::Security, 100.0),
            score(Dimension::Testing, 40.0),
            score(Dimension::TeamReadiness, 70.0),
        ];
        let expected = (100.0 * 3.0 + 40.0 * 2.0 + 70.0 * 1.5) / 6.5;
        assert!((overall_score(&scores) - expected).abs() < 1e-9);
    }

    #[test]
    fn skipped_dimensions_do_not_dilute_the_average() {
        let scores = [score(Dimension::Documentation, 55.0)];
        assert_eq!(overall_score(&scores), 55.0);
    }

    #[test]
    fn nothing_ran_scores_zero() {
        assert_eq!(overall_score(&[]), 0.0);
    }

    #[test]
    fn every_band_has_its_own_recommendation() {
        let sentences: Vec<String> = [95.0, 80.0, 60.0, 30.0, 10.0]
            .iter()
            .map(|value| executive_recommendation(ReadinessLevel::from_score(*value), 3))
            .collect();
        assert!(sentences[1].starts_with("Address 3 critical issues"));
        for (index, sentence) in sentences.iter().enumerate() {
            assert!(!sentences[index + 1..].contains(sentence));
        }
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_tenth(72.46), 72.5);
        assert_eq!(round_tenth(10.04), 10.0);
    }
}
