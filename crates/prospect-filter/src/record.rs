/// Boolean attributes a directory record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyFlag {
    TopCompany,
    Nonprofit,
    IsHiring,
    AppVideoPublic,
    DemoDayVideoPublic,
    AppAnswers,
    QuestionAnswers,
}

impl CompanyFlag {
    pub const ALL: [Self; 7] = [
        Self::TopCompany,
        Self::Nonprofit,
        Self::IsHiring,
        Self::AppVideoPublic,
        Self::DemoDayVideoPublic,
        Self::AppAnswers,
        Self::QuestionAnswers,
    ];
}

/// A record the predicate engine can match against a
/// [`FilterSpec`](crate::FilterSpec).
///
/// Every accessor has an empty default, so a record missing an attribute
/// behaves as if that attribute were blank. Implementors override the
/// accessors their data source actually provides.
pub trait Filterable {
    fn batch(&self) -> &str {
        ""
    }

    fn industry(&self) -> &str {
        ""
    }

    fn industries(&self) -> &[String] {
        &[]
    }

    fn regions(&self) -> &[String] {
        &[]
    }

    /// Free-text locations, checked when no entry of [`regions`](Self::regions) matches.
    fn location(&self) -> &str {
        ""
    }

    fn status(&self) -> &str {
        ""
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    fn stage(&self) -> &str {
        ""
    }

    fn team_size(&self) -> u32 {
        0
    }

    fn flag(&self, _flag: CompanyFlag) -> bool {
        false
    }
}
