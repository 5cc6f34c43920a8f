//! URL comparison for page-lock enforcement.

use crate::error::{LockError, Result};
use tracing::warn;
use url::Url;

/// Outcome of checking a top-frame navigation against a page lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationVerdict {
    /// The target is the locked document (fragment changes only).
    Allow,
    /// The target leaves the locked document; the tab must be sent back.
    Block,
}

/// Decides whether a page-locked tab may navigate from `locked` to `target`.
pub fn check_navigation(locked: &str, target: &str) -> NavigationVerdict {
    if same_document(locked, target) {
        NavigationVerdict::Allow
    } else {
        NavigationVerdict::Block
    }
}

/// Returns true if both URLs share origin, path and query.
///
/// Fragments are ignored. If either URL fails to parse, the comparison
/// falls back to the raw strings with their fragments removed, so a
/// malformed target only passes when it is textually the locked URL.
pub fn same_document(locked: &str, target: &str) -> bool {
    match (Url::parse(locked), Url::parse(target)) {
        (Ok(a), Ok(b)) => {
            a.origin().ascii_serialization() == b.origin().ascii_serialization()
                && a.path() == b.path()
                && search(&a) == search(&b)
        }
        (a, b) => {
            if let Err(e) = &a {
                warn!(url = locked, error = %e, "Locked URL does not parse, comparing raw text");
            }
            if let Err(e) = &b {
                warn!(url = target, error = %e, "Target URL does not parse, comparing raw text");
            }
            strip_fragment(locked) == strip_fragment(target)
        }
    }
}

/// Query string as a page script sees it: an empty `?` counts as no query.
fn search(url: &Url) -> Option<&str> {
    url.query().filter(|q| !q.is_empty())
}

fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(before, _)| before)
}

/// Returns true for hrefs that never leave the page: fragment references
/// and script-protocol references.
pub fn is_in_page_href(href: &str) -> bool {
    href.starts_with('#') || href.trim_start().to_ascii_lowercase().starts_with("javascript:")
}

/// Resolves a link's href against the page's own location.
pub fn resolve_link(page_url: &str, href: &str) -> Result<Url> {
    let base = Url::parse(page_url).map_err(|e| LockError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    base.join(href).map_err(|e| LockError::InvalidUrl {
        url: href.to_string(),
        reason: e.to_string(),
    })
}
