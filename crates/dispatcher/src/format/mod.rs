//! Header field encoders used by the sink pipeline
//!
//! Contains the elapsed-time field, the caller-info field and the rich-text
//! wrapper tags.

mod caller;
mod timestamp;

pub use self::caller::{CallerFormat, UNKNOWN_CALLER};
pub use self::timestamp::{TimestampFormat, MAX_DAYS};

use contracts::{ColorMapping, Severity};

/// Closing tag matching [`rich_text_open`]
pub const RICH_TEXT_CLOSE: &str = "</span>";

/// Opening `<span>` styled with the colors mapped to `severity`
pub fn rich_text_open(colors: &dyn ColorMapping, severity: Severity) -> String {
    format!(
        "<span style=\"background-color:{};color:{}\">",
        colors.background_or_default(severity),
        colors.foreground_or_default(severity)
    )
}

/// `[@label]` thread tag
pub fn thread_tag(label: &str) -> String {
    format!("[@{label}]")
}

/// `[X] ` severity prefix
pub fn severity_prefix(severity: Severity) -> String {
    format!("[{}] ", severity.letter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Color;

    struct ErrorsOnly;

    impl ColorMapping for ErrorsOnly {
        fn foreground(&self, severity: Severity) -> Option<Color> {
            (severity == Severity::Error).then(|| Color::named("white"))
        }

        fn background(&self, severity: Severity) -> Option<Color> {
            (severity == Severity::Error).then(|| Color::named("#c0392b"))
        }
    }

    #[test]
    fn test_rich_text_uses_mapping() {
        assert_eq!(
            rich_text_open(&ErrorsOnly, Severity::Error),
            "<span style=\"background-color:#c0392b;color:white\">"
        );
    }

    #[test]
    fn test_rich_text_falls_back() {
        assert_eq!(
            rich_text_open(&ErrorsOnly, Severity::Debug),
            "<span style=\"background-color:transparent;color:black\">"
        );
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(severity_prefix(Severity::Warning), "[W] ");
        assert_eq!(thread_tag("worker-1"), "[@worker-1]");
    }
}
