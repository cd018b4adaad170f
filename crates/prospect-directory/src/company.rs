use prospect_filter::{CompanyFlag, Filterable};
use serde::{Deserialize, Deserializer};

/// One company record from the directory dataset.
///
/// The dataset is hand-curated JSON: fields come and go, strings stand in
/// for booleans, and `null` shows up everywhere. Deserialization is
/// deliberately forgiving so one odd record never sinks a whole dump.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "de_string")]
    pub name: String,

    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,

    /// Directory profile page, the page emails are harvested from.
    #[serde(default, rename = "url", deserialize_with = "de_string")]
    pub profile_url: String,

    #[serde(default, deserialize_with = "de_string")]
    pub website: String,

    #[serde(default, deserialize_with = "de_string")]
    pub batch: String,

    #[serde(default, deserialize_with = "de_string")]
    pub status: String,

    #[serde(default, deserialize_with = "de_string")]
    pub industry: String,

    #[serde(default, deserialize_with = "de_list")]
    pub industries: Vec<String>,

    #[serde(default, deserialize_with = "de_list")]
    pub regions: Vec<String>,

    #[serde(default, deserialize_with = "de_string")]
    pub all_locations: String,

    #[serde(default, deserialize_with = "de_string")]
    pub one_liner: String,

    #[serde(default, deserialize_with = "de_list")]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "de_string")]
    pub stage: String,

    #[serde(default, deserialize_with = "de_team_size")]
    pub team_size: u32,

    #[serde(default, deserialize_with = "de_flag")]
    pub top_company: bool,

    #[serde(default, deserialize_with = "de_flag")]
    pub nonprofit: bool,

    #[serde(default, rename = "isHiring", deserialize_with = "de_flag")]
    pub is_hiring: bool,

    #[serde(default, deserialize_with = "de_flag")]
    pub app_video_public: bool,

    #[serde(default, deserialize_with = "de_flag")]
    pub demo_day_video_public: bool,

    #[serde(default, deserialize_with = "de_flag")]
    pub app_answers: bool,

    #[serde(default, deserialize_with = "de_flag")]
    pub question_answers: bool,
}

impl Filterable for Company {
    fn batch(&self) -> &str {
        &self.batch
    }

    fn industry(&self) -> &str {
        &self.industry
    }

    fn industries(&self) -> &[String] {
        &self.industries
    }

    fn regions(&self) -> &[String] {
        &self.regions
    }

    fn location(&self) -> &str {
        &self.all_locations
    }

    fn status(&self) -> &str {
        &self.status
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn stage(&self) -> &str {
        &self.stage
    }

    fn team_size(&self) -> u32 {
        self.team_size
    }

    fn flag(&self, flag: CompanyFlag) -> bool {
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

fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_team_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    use serde_json::Value;
    Ok(
        match Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null) {
            Value::Number(n) => n.as_f64().map(|f| f.max(0.0) as u32).unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        },
    )
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    use serde_json::Value;
    Ok(
        match Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null) {
            Value::Bool(b) => b,
            Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            _ => false,
        },
    )
}

#[cfg(test)]
mod tests {
    use prospect_filter::{matches, parse_filters};

    use super::*;

    #[test]
    fn full_record_deserializes() {
        let company: Company = serde_json::from_str(
            r#"{
                "name": "Acme",
                "slug": "acme",
                "url": "https://www.ycombinator.com/companies/acme",
                "website": "https://acme.dev",
                "batch": "Summer 2025",
                "status": "Active",
                "industry": "Consumer",
                "industries": ["Consumer", "Retail"],
                "regions": ["United States of America"],
                "all_locations": "San Francisco, CA, USA",
                "one_liner": "Anvils on demand",
                "tags": ["Marketplace"],
                "stage": "Early",
                "team_size": 12,
                "top_company": true,
                "isHiring": true
            }"#,
        )
        .unwrap();

        assert_eq!("Acme", company.name);
        assert_eq!("https://www.ycombinator.com/companies/acme", company.profile_url);
        assert_eq!(12, company.team_size);
        assert!(company.top_company);
        assert!(company.is_hiring);
        assert!(!company.nonprofit);
    }

    #[test]
    fn nulls_and_gaps_fall_back_to_defaults() {
        let company: Company = serde_json::from_str(
            r#"{
                "name": "Ghost",
                "website": null,
                "team_size": null,
                "regions": null,
                "top_company": null
            }"#,
        )
        .unwrap();

        assert_eq!("Ghost", company.name);
        assert_eq!("", company.website);
        assert_eq!(0, company.team_size);
        assert!(company.regions.is_empty());
        assert!(!company.top_company);
        assert_eq!("", company.batch);
    }

    #[test]
    fn flags_coerce_from_strings_and_numbers() {
        let company: Company = serde_json::from_str(
            r#"{"top_company": "True", "nonprofit": "no", "isHiring": 1}"#,
        )
        .unwrap();
        assert!(company.top_company);
        assert!(!company.nonprofit);
        assert!(company.is_hiring);
    }

    #[test]
    fn string_flag_matches_boolean_filter() {
        let company: Company =
            serde_json::from_str(r#"{"name": "Acme", "top_company": "true"}"#).unwrap();
        let spec = parse_filters("https://example.com/c?top_company=true");
        assert!(matches(&company, &spec));
        let spec = parse_filters("https://example.com/c?top_company=false");
        assert!(!matches(&company, &spec));
    }

    #[test]
    fn team_size_accepts_digit_strings() {
        let company: Company = serde_json::from_str(r#"{"team_size": "250"}"#).unwrap();
        assert_eq!(250, company.team_size);
        let company: Company = serde_json::from_str(r#"{"team_size": "n/a"}"#).unwrap();
        assert_eq!(0, company.team_size);
    }

    #[test]
    fn filterable_exposes_locations_as_fallback() {
        let company: Company = serde_json::from_str(
            r#"{"all_locations": "Berlin, Germany; Remote"}"#,
        )
        .unwrap();
        let spec = parse_filters("https://example.com/c?region=germany");
        assert!(matches(&company, &spec));
    }
}
