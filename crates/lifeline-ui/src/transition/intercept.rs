//! Link interception predicate
//!
//! Decides whether a click on an anchor should be turned into an animated
//! page transition or left to the browser.

/// What the click handler knows about the nearest enclosing anchor
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Raw `href` attribute
    pub href: Option<String>,
    /// Raw `target` attribute
    pub target: Option<String>,
    /// Modifier key or non-primary button held during the click
    pub modified: bool,
}

impl LinkInfo {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn modified(mut self, modified: bool) -> Self {
        self.modified = modified;
        self
    }
}

/// Why a click was left to the browser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Click did not land inside an anchor
    NoAnchor,
    /// `href` missing or blank
    EmptyHref,
    /// In-page fragment link
    Fragment,
    /// `mailto:` or `tel:` link
    Protocol,
    /// Absolute URL
    External,
    /// `target` or a modifier key opens another browsing context
    NewContext,
    /// Link points at the current document
    SamePage,
}

/// Outcome of the interception predicate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InterceptDecision {
    /// Suppress the default navigation and transition to this URL
    Intercept(String),
    /// A transition is already running; cancel the click entirely
    Swallow,
    /// Let the browser handle the click
    Skip(SkipReason),
}

impl InterceptDecision {
    pub fn is_intercept(&self) -> bool {
        matches!(self, InterceptDecision::Intercept(_))
    }

    /// The browser's default action must be cancelled
    pub fn prevents_default(&self) -> bool {
        !matches!(self, InterceptDecision::Skip(_))
    }
}

/// Apply the interception rules to a click.
///
/// The order of the checks only affects which [`SkipReason`] is reported;
/// any single match means the click is not intercepted. While a transition
/// is in flight, a click that would otherwise be intercepted is swallowed so
/// the browser cannot start a second navigation.
pub fn decide(link: Option<&LinkInfo>, current_path: &str, in_flight: bool) -> InterceptDecision {
    match classify(link, current_path) {
        InterceptDecision::Intercept(_) if in_flight => InterceptDecision::Swallow,
        decision => decision,
    }
}

fn classify(link: Option<&LinkInfo>, current_path: &str) -> InterceptDecision {
    use SkipReason::*;

    let Some(link) = link else {
        return InterceptDecision::Skip(NoAnchor);
    };
    let href = match link.href.as_deref().map(str::trim) {
        Some(href) if !href.is_empty() => href,
        _ => return InterceptDecision::Skip(EmptyHref),
    };
    if href.starts_with('#') {
        return InterceptDecision::Skip(Fragment);
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return InterceptDecision::Skip(Protocol);
    }
    if href.contains("://") {
        return InterceptDecision::Skip(External);
    }
    if link.modified || opens_new_context(link.target.as_deref()) {
        return InterceptDecision::Skip(NewContext);
    }
    if is_same_page(href, current_path) {
        return InterceptDecision::Skip(SamePage);
    }
    InterceptDecision::Intercept(href.to_string())
}

fn opens_new_context(target: Option<&str>) -> bool {
    match target.map(str::trim) {
        None | Some("") => false,
        Some(t) => !t.eq_ignore_ascii_case("_self"),
    }
}

/// `href` names the current document, either by full path or by its last segment.
pub(crate) fn is_same_page(href: &str, current_path: &str) -> bool {
    if href == current_path {
        return true;
    }
    let last_segment = current_path.rsplit('/').next().unwrap_or(current_path);
    !last_segment.is_empty() && href == last_segment
}
