//! Color mapping capability
//!
//! Sinks with rich text enabled ask a `ColorMapping` for the foreground and
//! background of each severity. Unmapped severities fall back to
//! [`Color::DEFAULT_FOREGROUND`] / [`Color::DEFAULT_BACKGROUND`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::Severity;

/// A CSS color value (`black`, `#ff0000`, `rgb(0, 0, 0)`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(Cow<'static, str>);

impl Color {
    pub const BLACK: Color = Color::named("black");
    pub const TRANSPARENT: Color = Color::named("transparent");

    pub const DEFAULT_FOREGROUND: Color = Color::BLACK;
    pub const DEFAULT_BACKGROUND: Color = Color::TRANSPARENT;

    pub const fn named(css: &'static str) -> Self {
        Self(Cow::Borrowed(css))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&'static str> for Color {
    fn from(s: &'static str) -> Self {
        Self(Cow::Borrowed(s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Severity to color lookup
pub trait ColorMapping: Send + Sync {
    /// Text color, `None` when the severity is unmapped
    fn foreground(&self, severity: Severity) -> Option<Color>;

    /// Background color, `None` when the severity is unmapped
    fn background(&self, severity: Severity) -> Option<Color>;

    /// Foreground with the black fallback applied
    fn foreground_or_default(&self, severity: Severity) -> Color {
        self.foreground(severity)
            .unwrap_or(Color::DEFAULT_FOREGROUND)
    }

    /// Background with the transparent fallback applied
    fn background_or_default(&self, severity: Severity) -> Color {
        self.background(severity)
            .unwrap_or(Color::DEFAULT_BACKGROUND)
    }
}
