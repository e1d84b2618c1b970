use crate::types::*;

/// Relative weight of each category in the overall score. Every category
/// weighs 1.0 by default, which makes the overall score a plain mean.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryWeights {
    weights: [f64; 7],
}

impl CategoryWeights {
    pub fn with(mut self, category: Category, weight: f64) -> Self {
        self.weights[index(category)] = weight.max(0.0);
        self
    }

    pub fn get(&self, category: Category) -> f64 {
        self.weights[index(category)]
    }

    pub fn is_uniform(&self) -> bool {
        self.weights.windows(2).all(|w| w[0] == w[1])
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self { weights: [1.0; 7] }
    }
}

fn index(category: Category) -> usize {
    Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default()
}

/// Mean of the checks' own scores, rounded half up. An empty category
/// scores 0.
pub fn aggregate_score(checks: &[CheckResult]) -> u8 {
    let scores: Vec<u8> = checks.iter().map(|c| c.score).collect();
    rounded_mean(&scores)
}

/// Round-half-up mean of integer scores, clamped to 0..=100.
pub fn rounded_mean(scores: &[u8]) -> u8 {
    if scores.is_empty() {
        return 0;
    }
    let n = scores.len() as u64;
    let sum: u64 = scores.iter().map(|&s| u64::from(s.min(100))).sum();
    ((sum * 2 + n) / (2 * n)).min(100) as u8
}

pub fn build_section(checks: Vec<CheckResult>) -> AnalysisSection {
    AnalysisSection {
        score: aggregate_score(&checks),
        checks,
    }
}

/// Overall score over every category. Uniform weights take the exact
/// integer path so the result equals `round(mean(scores))`.
pub fn overall_score(details: &Details, weights: &CategoryWeights) -> u8 {
    if weights.is_uniform() {
        let scores: Vec<u8> = Category::ALL.iter().map(|c| details.section(*c).score).collect();
        return rounded_mean(&scores);
    }

    let total_weight: f64 = Category::ALL.iter().map(|c| weights.get(*c)).sum();
    if total_weight <= 0.0 {
        return 0;
    }
    let weighted: f64 = Category::ALL
        .iter()
        .map(|c| weights.get(*c) * f64::from(details.section(*c).score))
        .sum();
    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}

pub fn assemble(url: &str, sections: Vec<(Category, Vec<CheckResult>)>) -> Report {
    assemble_weighted(url, sections, &CategoryWeights::default())
}

/// Builds the report. Categories absent from `sections` become empty
/// sections scoring 0 before any arithmetic happens.
pub fn assemble_weighted(
    url: &str,
    sections: Vec<(Category, Vec<CheckResult>)>,
    weights: &CategoryWeights,
) -> Report {
    let mut details = Details::default();
    for (category, checks) in sections {
        *details.section_mut(category) = build_section(checks);
    }

    Report {
        schema_version: SCHEMA_VERSION,
        url: url.to_string(),
        overall_score: overall_score(&details, weights),
        seo_score: details.seo.score,
        performance_score: details.performance.score,
        security_score: details.security.score,
        mobile_score: details.mobile.score,
        usability_score: details.usability.score,
        technologies_score: details.technologies.score,
        social_score: details.social.score,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: CheckMeta = CheckMeta::new("check", Impact::Medium, Difficulty::Easy);

    fn make_check(passed: bool, score: u8) -> CheckResult {
        META.result(passed, score, "test")
    }

    #[test]
    fn test_mean_of_check_scores() {
        let checks = vec![make_check(true, 100), make_check(false, 60), make_check(false, 0)];
        assert_eq!(aggregate_score(&checks), 53);
    }

    #[test]
    fn test_empty_category_scores_zero() {
        assert_eq!(aggregate_score(&[]), 0);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(rounded_mean(&[100, 75]), 88); // 87.5
        assert_eq!(rounded_mean(&[0, 1]), 1); // 0.5
        assert_eq!(rounded_mean(&[50, 51, 51]), 51); // 50.67
        assert_eq!(rounded_mean(&[100, 0, 0]), 33); // 33.33
    }

    #[test]
    fn test_score_ignores_passed_flag() {
        // A passed check with zero credit pulls the mean down like any other.
        let checks = vec![make_check(true, 0), make_check(true, 100)];
        assert_eq!(aggregate_score(&checks), 50);
    }

    #[test]
    fn test_assemble_defaults_missing_categories() {
        let report = assemble(
            "https://example.com/",
            vec![(Category::Security, vec![make_check(true, 100)])],
        );

        assert_eq!(report.security_score, 100);
        assert_eq!(report.seo_score, 0);
        assert!(report.details.social.checks.is_empty());
        assert_eq!(report.overall_score, 14); // 100 / 7
        assert_eq!(report.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_overall_is_rounded_mean_of_categories() {
        let sections = vec![
            (Category::Seo, vec![make_check(true, 90)]),
            (Category::Performance, vec![make_check(true, 80)]),
            (Category::Security, vec![make_check(true, 70)]),
            (Category::Mobile, vec![make_check(true, 100)]),
            (Category::Usability, vec![make_check(true, 100)]),
            (Category::Technologies, vec![make_check(true, 100)]),
            (Category::Social, vec![make_check(true, 55)]),
        ];
        let report = assemble("https://example.com/", sections);

        // 595 / 7 = 85.0
        assert_eq!(report.overall_score, 85);
        let sum: u32 = Category::ALL.iter().map(|c| u32::from(report.category_score(*c))).sum();
        assert_eq!(u32::from(report.overall_score), (sum as f64 / 7.0).round() as u32);
    }

    #[test]
    fn test_weighted_overall() {
        let sections = vec![
            (Category::Seo, vec![make_check(true, 100)]),
            (Category::Security, vec![make_check(false, 0)]),
        ];
        let weights = CategoryWeights::default()
            .with(Category::Performance, 0.0)
            .with(Category::Mobile, 0.0)
            .with(Category::Usability, 0.0)
            .with(Category::Technologies, 0.0)
            .with(Category::Social, 0.0)
            .with(Category::Seo, 3.0);
        let report = assemble_weighted("https://example.com/", sections, &weights);

        assert_eq!(report.overall_score, 75);
    }

    #[test]
    fn test_zero_weights_yield_zero() {
        let mut weights = CategoryWeights::default();
        for category in Category::ALL {
            weights = weights.with(category, 0.0);
        }
        let report = assemble_weighted("https://example.com/", vec![], &weights);
        assert_eq!(report.overall_score, 0);
    }
}
