use std::collections::HashSet;
use std::time::Duration;

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

// Keep the character classes exactly as they are: harvested ledgers depend
// on which strings this admits.
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap()
});

/// Containers holding chrome, not content. Their whole subtree is dropped
/// before text extraction.
const SKIPPED_CONTAINERS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    String::from("prospect")
}

fn default_timeout_secs() -> u64 {
    15
}

/// Fetches company profile pages and mines them for contact emails.
pub struct PageClient {
    client: reqwest::blocking::Client,
}

impl PageClient {
    pub fn new(config: &PageConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the page's visible text.
    pub fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        let html = self
            .client
            .get(url)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(page_text(&html))
    }

    /// GETs `url` and returns the emails its visible text exposes.
    pub fn harvest(&self, url: &str) -> anyhow::Result<Vec<String>> {
        Ok(extract_emails(&self.fetch_text(url)?))
    }
}

/// Text content of an HTML document, skipping [`SKIPPED_CONTAINERS`]
/// subtrees, with chunks trimmed and joined by single spaces.
pub fn page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut text = String::new();
    push_text(document.tree.root(), &mut text);
    text
}

fn push_text(node: NodeRef<Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(chunk) => {
                let chunk = chunk.text.trim();
                if !chunk.is_empty() {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(chunk);
                }
            }
            Node::Element(el) if SKIPPED_CONTAINERS.contains(&el.name()) => {}
            _ => push_text(child, out),
        }
    }
}

/// All email-like substrings of `text`, deduplicated, first occurrence
/// first.
pub fn extract_emails(text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    EMAIL
        .find_iter(text)
        .filter(|m| seen.insert(m.as_str()))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_dedupes_in_order() {
        let text = "Reach us at founders@acme.dev or jane.doe@acme.dev. \
                    Really: founders@acme.dev";
        assert_eq!(
            vec!["founders@acme.dev", "jane.doe@acme.dev"],
            extract_emails(text)
        );
    }

    #[test]
    fn ignores_non_addresses() {
        assert!(extract_emails("no at-signs here, nor @handles alone").is_empty());
        assert!(extract_emails("half@done").is_empty());
    }

    #[test]
    fn accepts_plus_and_percent_locals() {
        assert_eq!(
            vec!["jane+yc@acme.io"],
            extract_emails("ping jane+yc@acme.io today")
        );
    }

    #[test]
    fn page_text_drops_chrome_subtrees() {
        let html = r#"
            <html>
              <head><style>body { color: red; }</style></head>
              <body>
                <nav>nav@acme.dev</nav>
                <header><span>header@acme.dev</span></header>
                <main><p>Say hi: <b>team@acme.dev</b></p></main>
                <script>var x = "script@acme.dev";</script>
                <footer>footer@acme.dev</footer>
              </body>
            </html>"#;
        let text = page_text(html);
        assert_eq!(vec!["team@acme.dev"], extract_emails(&text));
    }

    #[test]
    fn page_text_joins_chunks_with_spaces() {
        let html = "<p>one</p><p>two</p>";
        assert_eq!("one two", page_text(html));
    }
}
