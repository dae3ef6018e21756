//! Support email drafts and their `mailto:` links.

use concierge_core::config::SupportConfig;

/// A pre-filled support email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Build the draft from the configured support template.
    pub fn from_config(support: &SupportConfig) -> Self {
        Self::new(&support.email, &support.subject, &support.body)
    }

    /// `mailto:` link with percent-encoded subject and body.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            urlencoding::encode(&self.subject),
            urlencoding::encode(&self.body)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailto_url_encodes_subject_and_body() {
        let draft = EmailDraft::new(
            "support@example.com",
            "Support Request",
            "Hello Team,\n\nI need help & advice",
        );
        assert_eq!(
            draft.mailto_url(),
            "mailto:support@example.com?subject=Support%20Request&body=Hello%20Team%2C%0A%0AI%20need%20help%20%26%20advice"
        );
    }

    #[test]
    fn test_from_config_uses_template() {
        let support = SupportConfig::default();
        let draft = EmailDraft::from_config(&support);
        assert_eq!(draft.to, support.email);
        assert_eq!(draft.subject, support.subject);
        assert_eq!(draft.body, support.body);
        assert!(draft.mailto_url().starts_with("mailto:support@example.com?subject="));
    }

    #[test]
    fn test_empty_body_still_produces_link() {
        let draft = EmailDraft::new("x@y.z", "", "");
        assert_eq!(draft.mailto_url(), "mailto:x@y.z?subject=&body=");
    }
}
