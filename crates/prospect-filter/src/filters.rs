use serde::Serialize;

use crate::record::CompanyFlag;

/// Constraints extracted from a company-directory URL.
///
/// Empty lists and `None` flags are inactive and constrain nothing, so the
/// default value matches every record. Categories combine with AND, the
/// tokens within one category with OR.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub batches: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub industries: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<String>,

    /// Range tokens such as `"26-50"` or `"1,000+"`, not parsed numbers.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team_sizes: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_company: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonprofit: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_hiring: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_video_public: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_day_video_public: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_answers: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_answers: Option<bool>,
}

impl FilterSpec {
    /// True when no category constrains anything.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
            && self.industries.is_empty()
            && self.regions.is_empty()
            && self.statuses.is_empty()
            && self.tags.is_empty()
            && self.stages.is_empty()
            && self.team_sizes.is_empty()
            && CompanyFlag::ALL.iter().all(|&f| self.flag(f).is_none())
    }

    /// The constraint on `flag`, or `None` when the URL left it alone.
    pub fn flag(&self, flag: CompanyFlag) -> Option<bool> {
        match flag {
            CompanyFlag::TopCompany => self.top_company,
            CompanyFlag::Nonprofit => self.nonprofit,
            CompanyFlag::IsHiring => self.is_hiring,
            CompanyFlag::AppVideoPublic => self.app_video_public,
            CompanyFlag::DemoDayVideoPublic => self.demo_day_video_public,
            CompanyFlag::AppAnswers => self.app_answers,
            CompanyFlag::QuestionAnswers => self.question_answers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(FilterSpec::default().is_empty());
    }

    #[test]
    fn any_flag_makes_it_non_empty() {
        let filters = FilterSpec {
            nonprofit: Some(false),
            ..Default::default()
        };
        assert!(!filters.is_empty());
        assert_eq!(Some(false), filters.flag(CompanyFlag::Nonprofit));
        assert_eq!(None, filters.flag(CompanyFlag::TopCompany));
    }

    #[test]
    fn serializes_active_categories_only() {
        let filters = FilterSpec {
            batches: vec!["Summer 2025".into()],
            top_company: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            serde_json::json!({"batches": ["Summer 2025"], "top_company": true}),
            json
        );
    }
}
