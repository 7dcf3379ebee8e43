//! Course website identification.
//!
//! Each course page links its own subsite on the institution's per-course
//! portal. The timetable feed is addressed by the two leading segments of
//! that link's path. Extraction is deliberately behind a trait so the
//! scraping strategy can change without touching callers.

use regex::Regex;

use crate::{Error, Result};

/// Anchor that marks the course subsite link on a course webpage.
const ANCHOR_PATTERN: &str = r#"<a title="Sito del corso" href="https://corsi\.unibo\.it/(.+?)""#;

/// The two-part key addressing a course's timetable feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseWebsiteId {
    /// Degree-type segment, e.g. `laurea`.
    pub tipologia: String,
    /// Course slug segment, e.g. `IngegneriaInformatica`.
    pub id: String,
}

impl CourseWebsiteId {
    /// Split a captured subsite path into its (degree-type, slug) parts.
    ///
    /// The capture must contain at least two `/`-separated segments; extra
    /// trailing segments are ignored.
    pub fn from_path(path: &str) -> Result<Self> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(tipologia), Some(id)) => Ok(Self {
                tipologia: tipologia.to_string(),
                id: id.to_string(),
            }),
            _ => Err(Error::WebsitePath {
                capture: path.to_string(),
            }),
        }
    }
}

/// Strategy for extracting a [`CourseWebsiteId`] from a course webpage body.
pub trait WebsiteLocator: Send + Sync {
    /// Locate the course website identifier in `html`.
    fn locate(&self, html: &str) -> Result<CourseWebsiteId>;
}

/// Locator matching the literal "Sito del corso" anchor with a regex.
pub struct AnchorLocator {
    pattern: Regex,
}

impl AnchorLocator {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(ANCHOR_PATTERN).expect("anchor pattern must compile"),
        }
    }
}

impl Default for AnchorLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl WebsiteLocator for AnchorLocator {
    fn locate(&self, html: &str) -> Result<CourseWebsiteId> {
        let captures = self.pattern.captures(html).ok_or(Error::WebsiteNotFound)?;
        CourseWebsiteId::from_path(&captures[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_the_course_website_anchor() {
        let html = r#"<html><body>
            <a title="Sito del corso" href="https://corsi.unibo.it/laurea/IngegneriaInformatica">sito</a>
        </body></html>"#;

        let id = AnchorLocator::new().locate(html).unwrap();
        assert_eq!(
            id,
            CourseWebsiteId {
                tipologia: "laurea".to_string(),
                id: "IngegneriaInformatica".to_string(),
            }
        );
    }

    #[test]
    fn missing_anchor_is_an_explicit_error() {
        let html = "<html><body><p>no link here</p></body></html>";

        let err = AnchorLocator::new().locate(html).unwrap_err();
        assert!(matches!(err, Error::WebsiteNotFound));
    }

    #[test]
    fn short_capture_is_an_explicit_error() {
        let html = r#"<a title="Sito del corso" href="https://corsi.unibo.it/laurea">sito</a>"#;

        let err = AnchorLocator::new().locate(html).unwrap_err();
        assert!(matches!(err, Error::WebsitePath { .. }));
    }

    #[test]
    fn extra_path_segments_are_ignored() {
        let id = CourseWebsiteId::from_path("magistrale/informatica/extra").unwrap();
        assert_eq!(id.tipologia, "magistrale");
        assert_eq!(id.id, "informatica");
    }
}
