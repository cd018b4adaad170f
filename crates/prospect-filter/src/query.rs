use std::borrow::Cow;

use url::form_urlencoded;
use url::Url;

use crate::filters::FilterSpec;

pub mod keys {
    //! Query parameters recognized by [`parse_filters`](super::parse_filters).

    pub const BATCH: &str = "batch"; // String list
    pub const INDUSTRY: &str = "industry"; // String list
    pub const REGION: &str = "region"; // String list
    pub const STATUS: &str = "status"; // String list
    pub const TAGS: &str = "tags"; // String list
    pub const STAGE: &str = "stage"; // String list

    pub const TEAM_SIZE: &str = "team_size"; // Range token, or JSON array of them

    pub const TOP_COMPANY: &str = "top_company"; // Boolean
    pub const NONPROFIT: &str = "nonprofit"; // Boolean
    pub const IS_HIRING: &str = "isHiring"; // Boolean
    pub const APP_VIDEO_PUBLIC: &str = "app_video_public"; // Boolean
    pub const DEMO_DAY_VIDEO_PUBLIC: &str = "demo_day_video_public"; // Boolean
    pub const APP_ANSWERS: &str = "app_answers"; // Boolean
    pub const QUESTION_ANSWERS: &str = "question_answers"; // Boolean
}

/// Extracts a [`FilterSpec`] from a company-directory URL.
///
/// Total over arbitrary strings: unparseable URLs, absent queries and
/// unknown parameters all degrade to inactive categories, never to errors.
/// List parameters keep every occurrence (blank values included), boolean
/// parameters and `team_size` keep the first. Booleans are true for the
/// case-insensitive values `true`, `1` and `yes`, false for anything else.
pub fn parse_filters(url: &str) -> FilterSpec {
    let query = extract_query(url);
    let mut spec = FilterSpec::default();
    let mut team_size_raw: Option<String> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            keys::BATCH => spec.batches.push(value.into_owned()),
            keys::INDUSTRY => spec.industries.push(value.into_owned()),
            keys::REGION => spec.regions.push(value.into_owned()),
            keys::STATUS => spec.statuses.push(value.into_owned()),
            keys::TAGS => spec.tags.push(value.into_owned()),
            keys::STAGE => spec.stages.push(value.into_owned()),
            keys::TEAM_SIZE => {
                if team_size_raw.is_none() {
                    team_size_raw = Some(value.into_owned());
                }
            }
            keys::TOP_COMPANY => set_flag(&mut spec.top_company, &value),
            keys::NONPROFIT => set_flag(&mut spec.nonprofit, &value),
            keys::IS_HIRING => set_flag(&mut spec.is_hiring, &value),
            keys::APP_VIDEO_PUBLIC => set_flag(&mut spec.app_video_public, &value),
            keys::DEMO_DAY_VIDEO_PUBLIC => set_flag(&mut spec.demo_day_video_public, &value),
            keys::APP_ANSWERS => set_flag(&mut spec.app_answers, &value),
            keys::QUESTION_ANSWERS => set_flag(&mut spec.question_answers, &value),
            _ => {}
        }
    }

    if let Some(raw) = team_size_raw {
        spec.team_sizes = parse_team_size_tokens(&raw);
    }

    spec
}

fn extract_query(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        return parsed.query().unwrap_or_default().to_string();
    }
    // Scheme-less or relative input. The fragment goes first: a `?`
    // inside it is not a query.
    let url = url.split_once('#').map_or(url, |(head, _fragment)| head);
    match url.split_once('?') {
        Some((_, query)) => query.to_string(),
        None => String::new(),
    }
}

fn set_flag(flag: &mut Option<bool>, value: &Cow<str>) {
    if flag.is_none() {
        *flag = Some(matches!(
            value.to_lowercase().as_str(),
            "true" | "1" | "yes"
        ));
    }
}

/// The directory UI sends `team_size` as a JSON array of range tokens,
/// older links as a single bare token. Malformed arrays degrade to no
/// constraint at all.
fn parse_team_size_tokens(raw: &str) -> Vec<String> {
    if raw.starts_with('[') && raw.ends_with(']') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::debug!("Ignoring malformed team_size filter {raw}: {e}");
                Vec::new()
            }
        }
    } else {
        vec![raw.to_string()]
    }
}
