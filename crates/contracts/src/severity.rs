//! Severity - ordered log level
//!
//! Ascending value means decreasing importance: `Error < Warning < Info < Debug < Trace`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::LogError;

/// Log severity, used both as a message tag and as a sink threshold
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Severity {
    Error = 0,
    #[serde(alias = "warn")]
    Warning = 1,
    #[default]
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl Severity {
    /// All severities, most important first
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
    ];

    /// Whether a message tagged `self` passes a sink configured with `threshold`
    #[inline]
    pub fn passes(self, threshold: Severity) -> bool {
        self <= threshold
    }

    /// One-letter tag used in the rendered `[X] ` prefix
    pub fn letter(self) -> char {
        match self {
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Info => 'I',
            Severity::Debug => 'D',
            Severity::Trace => 'T',
        }
    }

    /// Debug and Trace thresholds pay for source line capture
    #[inline]
    pub fn is_verbose(self) -> bool {
        self >= Severity::Debug
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Trace => "trace",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for Severity {
    type Error = LogError;

    fn try_from(value: u8) -> Result<Self, LogError> {
        Severity::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(LogError::SeverityOutOfRange {
                value: i64::from(value),
            })
    }
}

impl TryFrom<i64> for Severity {
    type Error = LogError;

    fn try_from(value: i64) -> Result<Self, LogError> {
        u8::try_from(value)
            .map_err(|_| LogError::SeverityOutOfRange { value })
            .and_then(Severity::try_from)
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" | "e" => Ok(Severity::Error),
            "warning" | "warn" | "w" => Ok(Severity::Warning),
            "info" | "i" => Ok(Severity::Info),
            "debug" | "d" => Ok(Severity::Debug),
            "trace" | "t" => Ok(Severity::Trace),
            other => other
                .parse::<i64>()
                .map_err(|_| LogError::UnknownSeverity {
                    name: s.to_string(),
                })
                .and_then(Severity::try_from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_by_verbosity() {
        assert!(Severity::Error < Severity::Warning);
        assert!(Severity::Warning < Severity::Info);
        assert!(Severity::Info < Severity::Debug);
        assert!(Severity::Debug < Severity::Trace);
    }

    #[test]
    fn test_passes_matches_ordering() {
        for threshold in Severity::ALL {
            for severity in Severity::ALL {
                assert_eq!(severity.passes(threshold), severity <= threshold);
            }
        }
        assert!(Severity::Error.passes(Severity::Error));
        assert!(!Severity::Debug.passes(Severity::Info));
    }

    #[test]
    fn test_letters() {
        let letters: String = Severity::ALL.iter().map(|s| s.letter()).collect();
        assert_eq!(letters, "EWIDT");
    }

    #[test]
    fn test_try_from_out_of_range() {
        assert_eq!(Severity::try_from(4u8).unwrap(), Severity::Trace);
        let err = Severity::try_from(5u8).unwrap_err();
        assert!(matches!(err, LogError::SeverityOutOfRange { value: 5 }));
        assert!(matches!(
            Severity::try_from(-1i64),
            Err(LogError::SeverityOutOfRange { value: -1 })
        ));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" debug ".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("0".parse::<Severity>().unwrap(), Severity::Error);
        assert!(matches!(
            "9".parse::<Severity>(),
            Err(LogError::SeverityOutOfRange { value: 9 })
        ));
        assert!(matches!(
            "loud".parse::<Severity>(),
            Err(LogError::UnknownSeverity { .. })
        ));
    }

    #[test]
    fn test_serde_alias() {
        let s: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(s, Severity::Warning);
        assert_eq!(serde_json::to_string(&Severity::Trace).unwrap(), "\"trace\"");
    }
}
