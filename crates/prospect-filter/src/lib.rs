mod filters;
mod matcher;
mod query;
mod record;
mod team_size;

pub use filters::FilterSpec;
pub use matcher::{filter_all, matches};
pub use query::{keys, parse_filters};
pub use record::{CompanyFlag, Filterable};
pub use team_size::{TeamSizeRange, FIVE_OR_MORE_TOKEN};
