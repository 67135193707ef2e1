//! Palette - table-backed `ColorMapping`

use std::collections::{BTreeMap, HashMap};

use contracts::{Color, ColorMapping, ColorOverride, Severity};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Entry {
    foreground: Option<Color>,
    background: Option<Color>,
}

/// Severity to color table.
///
/// Build one with [`Palette::standard`] at startup and share it via `Arc`
/// between sinks that don't override colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: HashMap<Severity, Entry>,
}

impl Palette {
    /// Palette with nothing mapped, every lookup falls back
    pub fn empty() -> Self {
        Self::default()
    }

    /// Default colors for rich-text sinks
    pub fn standard() -> Self {
        Self::empty()
            .with(Severity::Error, "#ffffff", "#c0392b")
            .with(Severity::Warning, "#000000", "#f1c40f")
            .with(Severity::Info, "#1f2d3d", "transparent")
            .with(Severity::Debug, "#5d6d7e", "transparent")
            .with(Severity::Trace, "#99a3a4", "transparent")
    }

    pub fn with(
        mut self,
        severity: Severity,
        foreground: impl Into<Color>,
        background: impl Into<Color>,
    ) -> Self {
        self.entries.insert(
            severity,
            Entry {
                foreground: Some(foreground.into()),
                background: Some(background.into()),
            },
        );
        self
    }

    pub fn set_foreground(&mut self, severity: Severity, color: impl Into<Color>) {
        self.entries.entry(severity).or_default().foreground = Some(color.into());
    }

    pub fn set_background(&mut self, severity: Severity, color: impl Into<Color>) {
        self.entries.entry(severity).or_default().background = Some(color.into());
    }

    /// Copy of `self` with configured overrides layered on top
    pub fn with_overrides(&self, overrides: &BTreeMap<Severity, ColorOverride>) -> Self {
        let mut palette = self.clone();
        for (severity, colors) in overrides {
            if let Some(fg) = &colors.foreground {
                palette.set_foreground(*severity, fg.clone());
            }
            if let Some(bg) = &colors.background {
                palette.set_background(*severity, bg.clone());
            }
        }
        palette
    }
}

impl ColorMapping for Palette {
    fn foreground(&self, severity: Severity) -> Option<Color> {
        self.entries
            .get(&severity)
            .and_then(|e| e.foreground.clone())
    }

    fn background(&self, severity: Severity) -> Option<Color> {
        self.entries
            .get(&severity)
            .and_then(|e| e.background.clone())
    }
}
