use crate::filters::FilterSpec;
use crate::record::{CompanyFlag, Filterable};
use crate::team_size::matches_team_size;

/// Decides whether `record` satisfies `filters`.
///
/// Categories combine with AND, the tokens within one category with OR.
/// Text tokens match as case-insensitive substrings of the record field;
/// boolean constraints must match exactly. Inactive categories never block.
pub fn matches(record: &impl Filterable, filters: &FilterSpec) -> bool {
    if !filters.batches.is_empty() && !contains_any(record.batch(), &filters.batches) {
        return false;
    }

    // The singular industry field first, then the industries list.
    if !filters.industries.is_empty()
        && !contains_any(record.industry(), &filters.industries)
        && !any_contains_any(record.industries(), &filters.industries)
    {
        return false;
    }

    // Region entries first, then the free-text location.
    if !filters.regions.is_empty()
        && !any_contains_any(record.regions(), &filters.regions)
        && !contains_any(record.location(), &filters.regions)
    {
        return false;
    }

    if !filters.statuses.is_empty() && !contains_any(record.status(), &filters.statuses) {
        return false;
    }

    if !filters.tags.is_empty() && !any_contains_any(record.tags(), &filters.tags) {
        return false;
    }

    if !filters.stages.is_empty() && !contains_any(record.stage(), &filters.stages) {
        return false;
    }

    if !matches_team_size(record.team_size(), &filters.team_sizes) {
        return false;
    }

    for flag in CompanyFlag::ALL {
        if let Some(wanted) = filters.flag(flag) {
            if record.flag(flag) != wanted {
                return false;
            }
        }
    }

    true
}

/// Keeps the records satisfying `filters`, in their original order.
pub fn filter_all<R: Filterable>(records: Vec<R>, filters: &FilterSpec) -> Vec<R> {
    records
        .into_iter()
        .filter(|record| matches(record, filters))
        .collect()
}

fn contains_any(field: &str, tokens: &[String]) -> bool {
    let field = field.to_lowercase();
    tokens
        .iter()
        .any(|token| field.contains(&token.to_lowercase()))
}

fn any_contains_any(fields: &[String], tokens: &[String]) -> bool {
    fields.iter().any(|field| contains_any(field, tokens))
}
