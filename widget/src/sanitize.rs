//! Sanitize-then-render contract for the catalog's HTML blurb.
//!
//! The catalog's description is untrusted markup. The widget never renders it;
//! it only hands out [`SafeHtml`], which can only be obtained from an
//! [`HtmlSanitizer`].

use serde::Serialize;
use std::fmt;

/// Markup that has been through a sanitizer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    /// Wrap the output of a sanitizer
    ///
    /// Only [`HtmlSanitizer`] implementations should call this.
    #[must_use]
    pub const fn from_sanitized(html: String) -> Self {
        Self(html)
    }

    /// Returns the sanitized markup
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// External `sanitize(html) -> safeHtml` collaborator
pub trait HtmlSanitizer {
    /// Strip anything unsafe from `html`
    fn sanitize(&self, html: &str) -> SafeHtml;
}

impl<F> HtmlSanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, html: &str) -> SafeHtml {
        SafeHtml::from_sanitized(self(html))
    }
}

/// Sanitizer that escapes all markup, so the blurb renders as plain text
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapingSanitizer;

impl HtmlSanitizer for EscapingSanitizer {
    fn sanitize(&self, html: &str) -> SafeHtml {
        let mut escaped = String::with_capacity(html.len());
        for c in html.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                other => escaped.push(other),
            }
        }
        SafeHtml::from_sanitized(escaped)
    }
}
