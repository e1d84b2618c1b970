// src/types.rs

use serde::{Deserialize, Serialize};

/// Version written into every freshly assembled report. Records without a
/// version are treated as version 1.
pub const SCHEMA_VERSION: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Hard,
    Medium,
    Easy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Seo,
    Performance,
    Security,
    Mobile,
    Usability,
    Technologies,
    Social,
}

impl Category {
    /// Declaration order, also the order sections are evaluated in.
    pub const ALL: [Category; 7] = [
        Category::Seo,
        Category::Performance,
        Category::Security,
        Category::Mobile,
        Category::Usability,
        Category::Technologies,
        Category::Social,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Seo => "seo",
            Category::Performance => "performance",
            Category::Security => "security",
            Category::Mobile => "mobile",
            Category::Usability => "usability",
            Category::Technologies => "technologies",
            Category::Social => "social",
        }
    }
}

/// Static identity of a check. Every result a check produces is built from
/// the same `CheckMeta`, so impact and difficulty never vary with the outcome.
#[derive(Clone, Copy, Debug)]
pub struct CheckMeta {
    pub title: &'static str,
    pub impact: Impact,
    pub difficulty: Difficulty,
    pub learn_more_url: Option<&'static str>,
}

impl CheckMeta {
    pub const fn new(title: &'static str, impact: Impact, difficulty: Difficulty) -> Self {
        Self {
            title,
            impact,
            difficulty,
            learn_more_url: None,
        }
    }

    pub const fn learn_more(mut self, url: &'static str) -> Self {
        self.learn_more_url = Some(url);
        self
    }

    pub fn result(&self, passed: bool, score: u8, description: impl Into<String>) -> CheckResult {
        CheckResult {
            passed,
            score: score.min(100),
            title: self.title.to_string(),
            description: description.into(),
            impact: self.impact,
            difficulty: self.difficulty,
            explanation: String::new(),
            how_to_fix: String::new(),
            recommendation: None,
            learn_more_url: self.learn_more_url.map(str::to_string),
            details: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub passed: bool,
    pub score: u8,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub difficulty: Difficulty,
    pub explanation: String,
    pub how_to_fix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn_more_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CheckResult {
    pub fn explain(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn fix(mut self, how_to_fix: impl Into<String>) -> Self {
        self.how_to_fix = how_to_fix.into();
        self
    }

    pub fn recommend(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    /// Guidance to display: `how_to_fix`, falling back to the short form.
    pub fn remediation(&self) -> Option<&str> {
        if !self.how_to_fix.is_empty() {
            Some(&self.how_to_fix)
        } else {
            self.recommendation.as_deref()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub score: u8,
    pub checks: Vec<CheckResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub seo: AnalysisSection,
    pub performance: AnalysisSection,
    pub security: AnalysisSection,
    pub mobile: AnalysisSection,
    pub usability: AnalysisSection,
    pub technologies: AnalysisSection,
    pub social: AnalysisSection,
}

impl Details {
    pub fn section(&self, category: Category) -> &AnalysisSection {
        match category {
            Category::Seo => &self.seo,
            Category::Performance => &self.performance,
            Category::Security => &self.security,
            Category::Mobile => &self.mobile,
            Category::Usability => &self.usability,
            Category::Technologies => &self.technologies,
            Category::Social => &self.social,
        }
    }

    pub fn section_mut(&mut self, category: Category) -> &mut AnalysisSection {
        match category {
            Category::Seo => &mut self.seo,
            Category::Performance => &mut self.performance,
            Category::Security => &mut self.security,
            Category::Mobile => &mut self.mobile,
            Category::Usability => &mut self.usability,
            Category::Technologies => &mut self.technologies,
            Category::Social => &mut self.social,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub schema_version: u32,
    pub url: String,
    pub overall_score: u8,
    pub seo_score: u8,
    pub performance_score: u8,
    pub security_score: u8,
    pub mobile_score: u8,
    pub usability_score: u8,
    pub technologies_score: u8,
    pub social_score: u8,
    pub details: Details,
}

impl Report {
    pub fn category_score(&self, category: Category) -> u8 {
        match category {
            Category::Seo => self.seo_score,
            Category::Performance => self.performance_score,
            Category::Security => self.security_score,
            Category::Mobile => self.mobile_score,
            Category::Usability => self.usability_score,
            Category::Technologies => self.technologies_score,
            Category::Social => self.social_score,
        }
    }

    pub fn section(&self, category: Category) -> &AnalysisSection {
        self.details.section(category)
    }

    /// Finds a check by title anywhere in the report.
    pub fn find_check(&self, category: Category, title: &str) -> Option<&CheckResult> {
        self.section(category).checks.iter().find(|c| c.title == title)
    }
}
