mod client;
mod company;
mod emails;

pub use client::{DirectoryClient, DirectoryConfig};
pub use company::Company;
pub use emails::{extract_emails, page_text, PageClient, PageConfig};

pub use anyhow;
