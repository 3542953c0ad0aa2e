//! Severity mapping and category rules for normalized events.
//!
//! Both are pure: severity is a straight table over the level code, and
//! the request-trace views are a declarative `(name, predicate)` table
//! evaluated once over an event list. Views are intentionally
//! non-exclusive; an event may belong to several.

use crate::parser::schema::NormalizedEvent;

/// Display severity derived from an event's level code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Verbose,
    /// Unknown or missing level code
    Na,
}

impl Severity {
    /// Map a level code: "1" through "5"; anything else is `Na`.
    pub fn from_level(level: &str) -> Self {
        match level {
            "1" => Severity::Critical,
            "2" => Severity::Error,
            "3" => Severity::Warning,
            "4" => Severity::Info,
            "5" => Severity::Verbose,
            _ => Severity::Na,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
            Severity::Verbose => "Verbose",
            Severity::Na => "N/A",
        }
    }

    /// Display-emphasis class, only for the three highlighted severities.
    pub fn emphasis_class(&self) -> Option<&'static str> {
        match self {
            Severity::Critical => Some("severity-critical"),
            Severity::Error => Some("severity-error"),
            Severity::Warning => Some("severity-warning"),
            _ => None,
        }
    }
}

pub type ViewPredicate = fn(&NormalizedEvent) -> bool;

/// The eight named views over a request trace, in tab order.
///
/// Predicates are independent and non-exclusive by design.
pub const VIEW_TABLE: &[(&str, ViewPredicate)] = &[
    ("Complete Request Trace", |_| true),
    ("Filter Notifications", |ev| ev.has_attr("FilterName")),
    ("Module Notifications", |ev| {
        ev.has_attr("ModuleName") && ev.has_attr("Notification")
    }),
    ("Performance View", |_| true),
    ("Authentication Authorization", |ev| {
        opcode(ev).starts_with("AUTH_") || opcode(ev).starts_with("SECURITY_")
    }),
    ("ASP.Net Page Traces", |ev| {
        matches!(
            opcode(ev),
            "AspNetPageTraceWarnEvent" | "AspNetPageTraceWriteEvent"
        )
    }),
    ("Custom Module Traces", |ev| opcode(ev).contains("ModuleDiag")),
    ("FastCGI Module", |ev| opcode(ev).starts_with("FASTCGI_")),
];

/// Views that include every event regardless of content.
const CATCH_ALL_VIEWS: &[&str] = &["Complete Request Trace", "Performance View"];

/// Opcode attached during request-trace parsing; "N/A" when absent.
pub fn opcode(ev: &NormalizedEvent) -> &str {
    ev.attr("Opcode").unwrap_or("N/A")
}

/// First specific view an event belongs to, used as its category tag.
pub fn classify(ev: &NormalizedEvent) -> Option<String> {
    VIEW_TABLE
        .iter()
        .filter(|(name, _)| !CATCH_ALL_VIEWS.contains(name))
        .find(|(_, predicate)| predicate(ev))
        .map(|(name, _)| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with(attrs: &[(&str, &str)]) -> NormalizedEvent {
        let mut ev = NormalizedEvent::new("IIS:trace");
        for (k, v) in attrs {
            ev.push_attr(*k, *v);
        }
        ev
    }

    #[test]
    fn test_severity_table() {
        assert_eq!(Severity::from_level("1"), Severity::Critical);
        assert_eq!(Severity::from_level("2"), Severity::Error);
        assert_eq!(Severity::from_level("3"), Severity::Warning);
        assert_eq!(Severity::from_level("4"), Severity::Info);
        assert_eq!(Severity::from_level("5"), Severity::Verbose);
        assert_eq!(Severity::from_level("9"), Severity::Na);
        assert_eq!(Severity::from_level(""), Severity::Na);
    }

    #[test]
    fn test_severity_emphasis_only_for_high_levels() {
        assert_eq!(
            Severity::from_level("1").emphasis_class(),
            Some("severity-critical")
        );
        assert_eq!(Severity::from_level("4").emphasis_class(), None);
        assert_eq!(Severity::Na.label(), "N/A");
    }

    #[test]
    fn test_module_notification_requires_both_attributes() {
        let both = event_with(&[("ModuleName", "Rewrite"), ("Notification", "16")]);
        let module_view = VIEW_TABLE
            .iter()
            .find(|(name, _)| *name == "Module Notifications")
            .unwrap();
        assert!(module_view.1(&both));

        let only_module = event_with(&[("ModuleName", "Rewrite")]);
        assert!(!module_view.1(&only_module));

        // Complete trace membership is unaffected by the missing attribute
        let complete = VIEW_TABLE.first().unwrap();
        assert!(complete.1(&only_module));
    }

    #[test]
    fn test_opcode_views() {
        let auth = event_with(&[("Opcode", "AUTH_SUCCESS")]);
        let security = event_with(&[("Opcode", "SECURITY_START")]);
        let fastcgi = event_with(&[("Opcode", "FASTCGI_REQUEST_START")]);
        let aspx = event_with(&[("Opcode", "AspNetPageTraceWriteEvent")]);
        let diag = event_with(&[("Opcode", "RewriteModuleDiagInfo")]);

        assert_eq!(classify(&auth).as_deref(), Some("Authentication Authorization"));
        assert_eq!(classify(&security).as_deref(), Some("Authentication Authorization"));
        assert_eq!(classify(&fastcgi).as_deref(), Some("FastCGI Module"));
        assert_eq!(classify(&aspx).as_deref(), Some("ASP.Net Page Traces"));
        assert_eq!(classify(&diag).as_deref(), Some("Custom Module Traces"));
    }

    #[test]
    fn test_unmatched_event_has_no_category() {
        let plain = event_with(&[("Opcode", "GENERAL_REQUEST_START")]);
        assert_eq!(classify(&plain), None);
    }
}
