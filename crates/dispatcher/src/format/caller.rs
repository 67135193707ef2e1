//! Caller-info header field
//!
//! `[ {pad}{scope}.{member}():{line} ]`, right-aligned and always exactly
//! `width` characters wide.

use contracts::{validate_caller_width, CallSite, LogError, DEFAULT_CALLER_WIDTH};

/// Rendered when no external frame was found
pub const UNKNOWN_CALLER: &str = "?.?:?";

const ELLIPSIS: &str = "...";

/// Encoder for the caller-info field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerFormat {
    width: usize,
}

impl Default for CallerFormat {
    fn default() -> Self {
        Self {
            width: DEFAULT_CALLER_WIDTH,
        }
    }
}

impl CallerFormat {
    /// # Errors
    /// `LogError::ConfigValidation` when `width` is outside 5..=70
    pub fn new(width: usize) -> Result<Self, LogError> {
        validate_caller_width(width)?;
        Ok(Self { width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Render the field for `site`. The line is shown only when `with_line`.
    pub fn encode(&self, site: Option<&CallSite>, with_line: bool) -> String {
        let text = match site {
            Some(site) if with_line => site.to_string(),
            Some(site) => format!("{}.{}()", site.scope, site.member),
            None => UNKNOWN_CALLER.to_string(),
        };
        self.frame(&text)
    }

    fn frame(&self, text: &str) -> String {
        // brackets and their inner spaces take 4 columns
        let inner = self.width - 4;
        let len = text.chars().count();

        let mut out = String::with_capacity(self.width + 8);
        out.push_str("[ ");
        if len > inner {
            if inner > ELLIPSIS.len() {
                let keep = inner - ELLIPSIS.len();
                out.push_str(ELLIPSIS);
                out.extend(text.chars().skip(len - keep));
            } else {
                out.extend(ELLIPSIS.chars().take(inner));
            }
        } else {
            out.extend(std::iter::repeat(' ').take(inner - len));
            out.push_str(text);
        }
        out.push_str(" ]");
        out
    }
}
