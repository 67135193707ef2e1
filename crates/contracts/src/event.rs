//! LogEvent - one dispatched message and its context
//!
//! Built once per dispatch and handed by reference to every sink, so all
//! sinks observe the same elapsed time and thread attribution.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use crate::Severity;

/// Resolved location of the code that issued a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Declaring scope (module path or type path)
    pub scope: Cow<'static, str>,
    /// Function or method name
    pub member: Cow<'static, str>,
    /// Source file, when known
    pub file: Option<Cow<'static, str>>,
    /// Source line, when known
    pub line: Option<u32>,
}

impl CallSite {
    /// Call site captured at compile time
    pub const fn new_static(
        scope: &'static str,
        member: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            scope: Cow::Borrowed(scope),
            member: Cow::Borrowed(member),
            file: Some(Cow::Borrowed(file)),
            line: Some(line),
        }
    }

    /// Split a fully qualified function path (`a::b::Type::method`) into
    /// scope and member. Paths without `::` get `?` as their scope.
    pub fn from_path(path: &str) -> Self {
        let (scope, member) = split_path(path);
        Self {
            scope: Cow::Owned(scope.to_string()),
            member: Cow::Owned(member.to_string()),
            file: None,
            line: None,
        }
    }

    pub fn with_location(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

fn split_path(path: &str) -> (&str, &str) {
    // `<T as Trait>::method` keeps its angle-bracketed prefix as the scope.
    let mut depth = 0usize;
    let mut split_at = None;
    let bytes = path.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => split_at = Some(i),
            _ => {}
        }
    }
    match split_at {
        Some(i) => (&path[..i], &path[i + 2..]),
        None => ("?", path),
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}()", self.scope, self.member)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

/// A single log event as seen by sinks
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Raw message text, rendered verbatim
    pub message: String,
    pub severity: Severity,
    /// Time since the dispatcher was created
    pub elapsed: Duration,
    /// Thread name, or its numeric id as 8 lowercase hex digits
    pub thread_label: String,
    /// Whether the event was issued by the thread that created the dispatcher
    pub is_creator_thread: bool,
    pub call_site: Option<CallSite>,
}
