use crate::error::CardError;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 120;
/// Maximum URL length, in characters.
pub const MAX_URL_LENGTH: usize = 2048;

/// Stable identity of a card, assigned by the store at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(i64);

impl CardId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for CardId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A link card as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub url: String,
    /// Defines the display order together with the title tie-break.
    pub sort_key: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Title and URL of a card that passed input validation.
///
/// The only way to obtain one is [`NewCard::parse`], so repositories can
/// trust the contents without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    title: String,
    url: String,
}

impl NewCard {
    /// Trims and validates raw form input.
    ///
    /// The title must be non-empty and at most [`MAX_TITLE_LENGTH`] characters.
    /// The URL must be an absolute `http` or `https` URL with a host and at most
    /// [`MAX_URL_LENGTH`] characters. The URL is kept as entered (minus
    /// surrounding whitespace), not normalized.
    pub fn parse(title: &str, url: &str) -> Result<Self, CardError> {
        let title = title.trim();
        let url = url.trim();

        Self::validate_title(title)?;
        Self::validate_url(url)?;

        Ok(Self {
            title: title.to_owned(),
            url: url.to_owned(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn validate_title(title: &str) -> Result<(), CardError> {
        if title.is_empty() {
            return Err(CardError::EmptyTitle);
        }

        let length = title.chars().count();
        if length > MAX_TITLE_LENGTH {
            return Err(CardError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
                actual: length,
            });
        }

        Ok(())
    }

    fn validate_url(raw: &str) -> Result<(), CardError> {
        if raw.is_empty() {
            return Err(CardError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let length = raw.chars().count();
        if length > MAX_URL_LENGTH {
            return Err(CardError::UrlTooLong {
                max: MAX_URL_LENGTH,
                actual: length,
            });
        }

        let parsed = Url::parse(raw)
            .map_err(|e| CardError::InvalidUrl(format!("'{}' is not an absolute URL: {e}", raw)))?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CardError::InvalidUrl(format!(
                    "scheme must be http or https, got '{}'",
                    scheme
                )))
            }
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(CardError::InvalidUrl(format!("'{}' has no host", raw)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_absolute_http_and_https() {
        assert!(NewCard::parse("Docs", "https://example.com").is_ok());
        assert!(NewCard::parse("Plex", "http://192.168.1.10:32400").is_ok());
    }

    #[test]
    fn trims_input() {
        let card = NewCard::parse("  Grafana ", " https://grafana.lan/ ").unwrap();
        assert_eq!(card.title(), "Grafana");
        assert_eq!(card.url(), "https://grafana.lan/");
    }

    #[test]
    fn rejects_other_schemes_and_relative_urls() {
        for url in [
            "ftp://example.com",
            "javascript:alert(1)",
            "/relative",
            "",
            "   ",
            "example.com",
        ] {
            assert!(
                matches!(NewCard::parse("x", url), Err(CardError::InvalidUrl(_))),
                "expected {url:?} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_blank_title() {
        assert_eq!(
            NewCard::parse("   ", "https://example.com"),
            Err(CardError::EmptyTitle)
        );
    }

    #[test]
    fn length_caps() {
        assert!(NewCard::parse(&"t".repeat(MAX_TITLE_LENGTH), "https://a.lan").is_ok());
        assert!(matches!(
            NewCard::parse(&"t".repeat(MAX_TITLE_LENGTH + 1), "https://a.lan"),
            Err(CardError::TitleTooLong { .. })
        ));

        let long_url = format!("https://a.lan/{}", "p".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            NewCard::parse("t", &long_url),
            Err(CardError::UrlTooLong { .. })
        ));
    }

    #[test]
    fn card_serializes_camel_case() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let card = Card {
            id: CardId::new(7),
            title: "NAS".to_string(),
            url: "https://nas.lan".to_string(),
            sort_key: 3,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["sortKey"], 3);
        assert!(json["createdAt"].is_string());
        assert!(json["updatedAt"].is_string());
    }
}
