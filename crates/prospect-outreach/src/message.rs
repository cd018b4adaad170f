use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Placeholder substituted per recipient in subjects and bodies.
pub const FOUNDER_NAME_VAR: &str = "{founder_name}";

/// Email locals treated as shared inboxes rather than people.
const GENERIC_PREFIXES: [&str; 18] = [
    "founders",
    "founder",
    "team",
    "hello",
    "hi",
    "contact",
    "info",
    "support",
    "admin",
    "sales",
    "business",
    "general",
    "mail",
    "office",
    "help",
    "service",
    "inquiries",
    "partnerships",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageTemplate {
    #[serde(default = "default_subject")]
    pub subject: String,

    #[serde(default = "default_body")]
    pub body: String,
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            body: default_body(),
        }
    }
}

fn default_subject() -> String {
    String::from("quick question")
}

fn default_body() -> String {
    String::from(
        "Hi {founder_name},\n\n\
         I came across your company and wanted to reach out. \
         Would you be open to a short chat this week?\n\n\
         Best regards",
    )
}

impl MessageTemplate {
    /// Substitutes [`FOUNDER_NAME_VAR`] in both parts.
    pub fn render(&self, founder_name: &str) -> (String, String) {
        (
            self.subject.replace(FOUNDER_NAME_VAR, founder_name),
            self.body.replace(FOUNDER_NAME_VAR, founder_name),
        )
    }
}

/// Best-effort greeting name for a recipient.
///
/// A personal-looking email local becomes a title-cased name. Generic
/// inboxes fall back to `"<company> team"` when the company name is short,
/// and to `"there"` otherwise.
pub fn founder_name(company_name: &str, email: &str) -> String {
    let local = match email.split_once('@') {
        Some((local, _)) => local.to_lowercase(),
        None => email.to_lowercase(),
    };

    let is_generic = GENERIC_PREFIXES.iter().any(|prefix| local.contains(prefix));
    if !is_generic {
        let cleaned: String = local
            .replace(['.', '_', '-'], " ")
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect();
        let cleaned = cleaned.trim();
        let compact: String = cleaned.chars().filter(|c| *c != ' ').collect();
        if cleaned.chars().count() >= 2
            && !compact.is_empty()
            && compact.chars().all(char::is_alphabetic)
        {
            return title_case(cleaned);
        }
    }

    let company: String = company_name
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();
    let company = company.trim();
    if !company.is_empty()
        && company.split_whitespace().count() <= 2
        && company.chars().count() <= 20
    {
        return format!("{company} team");
    }

    String::from("there")
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Assembles a minimal RFC 2822 text message and encodes it the way the
/// mail API's `raw` field expects: URL-safe base64 of the full message.
pub fn encode_message(to: &str, subject: &str, body: &str) -> String {
    let message = format!(
        "To: {to}\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=\"utf-8\"\r\n\
         \r\n\
         {body}"
    );
    URL_SAFE.encode(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_local_becomes_a_name() {
        assert_eq!("Jane", founder_name("Acme", "jane@acme.test"));
        assert_eq!("Jane Doe", founder_name("Acme", "jane.doe@acme.test"));
        assert_eq!("Jane Doe", founder_name("Acme", "JANE_DOE@acme.test"));
    }

    #[test]
    fn digits_are_stripped_from_names() {
        assert_eq!("Jane", founder_name("Acme", "jane42@acme.test"));
    }

    #[test]
    fn generic_local_uses_short_company_name() {
        assert_eq!("Acme team", founder_name("Acme", "founders@acme.test"));
        assert_eq!("Acme Labs team", founder_name("Acme Labs!", "info@acme.test"));
    }

    #[test]
    fn generic_detection_is_substring_based() {
        // "support" hides inside the local part.
        assert_eq!("Acme team", founder_name("Acme", "techsupport99@acme.test"));
    }

    #[test]
    fn long_company_names_fall_back_to_there() {
        assert_eq!(
            "there",
            founder_name("Extremely Long Company Name Inc", "hello@x.test")
        );
        assert_eq!("there", founder_name("", "team@x.test"));
    }

    #[test]
    fn unusable_locals_fall_back_like_generics() {
        // All digits, so nothing is left once numbers go.
        assert_eq!("Acme team", founder_name("Acme", "1234@acme.test"));
    }

    #[test]
    fn render_substitutes_the_placeholder() {
        let template = MessageTemplate {
            subject: "for {founder_name}".to_string(),
            body: "Hi {founder_name}, hello again {founder_name}.".to_string(),
        };
        let (subject, body) = template.render("Jane");
        assert_eq!("for Jane", subject);
        assert_eq!("Hi Jane, hello again Jane.", body);
    }

    #[test]
    fn default_template_greets_by_name() {
        let (_, body) = MessageTemplate::default().render("Jane");
        assert!(body.starts_with("Hi Jane,"));
        assert!(!body.contains(FOUNDER_NAME_VAR));
    }

    #[test]
    fn encoded_message_round_trips() {
        let raw = encode_message("jane@acme.test", "hi there", "two\nlines");
        let decoded = String::from_utf8(URL_SAFE.decode(raw).unwrap()).unwrap();
        assert!(decoded.starts_with("To: jane@acme.test\r\n"));
        assert!(decoded.contains("Subject: hi there\r\n"));
        assert!(decoded.ends_with("\r\n\r\ntwo\nlines"));
    }
}
