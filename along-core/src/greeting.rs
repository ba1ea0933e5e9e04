//! Recipient personalization from the `to` query parameter.

use url::{form_urlencoded, Url};

/// Query parameter carrying the recipient's name
pub const RECIPIENT_PARAM: &str = "to";

/// Placeholder used when no recipient is given
pub const DEFAULT_RECIPIENT: &str = "một người bạn";

/// Who the greeting is addressed to.
///
/// The name is plain text; it must be escaped by whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    name: String,
    personalized: bool,
}

impl Recipient {
    /// Read the recipient from a link, falling back to `default_name`.
    ///
    /// Accepts a full URL (`along://open?to=Lan`), a bare query string with or
    /// without the leading `?`, or `None`. Blank values count as absent.
    #[must_use]
    pub fn from_link(link: Option<&str>, default_name: &str) -> Self {
        link.and_then(recipient_from_link).map_or_else(
            || Self {
                name: default_name.to_string(),
                personalized: false,
            },
            |name| Self {
                name,
                personalized: true,
            },
        )
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the name came from the link rather than the placeholder
    #[must_use]
    pub const fn is_personalized(&self) -> bool {
        self.personalized
    }
}

impl Default for Recipient {
    fn default() -> Self {
        Self::from_link(None, DEFAULT_RECIPIENT)
    }
}

fn recipient_from_link(link: &str) -> Option<String> {
    let link = link.trim();
    let query = match Url::parse(link) {
        Ok(url) => url.query().unwrap_or_default().to_string(),
        Err(_) => link.trim_start_matches('?').to_string(),
    };

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == RECIPIENT_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|name| !name.is_empty())
}
