//! RenderFlags - per-sink rendering capabilities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Optional header fields and behaviours of a sink.
///
/// Combined once when a sink is built; a sink never changes its flags afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderFlags {
    /// Wrap each line in a styled `<span>`
    pub rich_text: bool,
    /// The target is a file on disk
    pub backed_by_file: bool,
    /// Emit the elapsed-time field
    pub timestamp: bool,
    /// Emit the caller-info field
    pub caller_info: bool,
    /// Emit the `[@label]` tag on every line. Without it the tag only
    /// appears for events from threads other than the dispatcher's creator.
    pub thread_info: bool,
}

impl RenderFlags {
    pub const NONE: RenderFlags = RenderFlags {
        rich_text: false,
        backed_by_file: false,
        timestamp: false,
        caller_info: false,
        thread_info: false,
    };

    pub const ALL: RenderFlags = RenderFlags {
        rich_text: true,
        backed_by_file: true,
        timestamp: true,
        caller_info: true,
        thread_info: true,
    };

    pub const fn with_rich_text(mut self) -> Self {
        self.rich_text = true;
        self
    }

    pub const fn with_backed_by_file(mut self) -> Self {
        self.backed_by_file = true;
        self
    }

    pub const fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }

    pub const fn with_caller_info(mut self) -> Self {
        self.caller_info = true;
        self
    }

    pub const fn with_thread_info(mut self) -> Self {
        self.thread_info = true;
        self
    }

    /// Union of two flag sets
    pub const fn union(self, other: RenderFlags) -> Self {
        RenderFlags {
            rich_text: self.rich_text || other.rich_text,
            backed_by_file: self.backed_by_file || other.backed_by_file,
            timestamp: self.timestamp || other.timestamp,
            caller_info: self.caller_info || other.caller_info,
            thread_info: self.thread_info || other.thread_info,
        }
    }

    pub const fn is_empty(self) -> bool {
        !(self.rich_text
            || self.backed_by_file
            || self.timestamp
            || self.caller_info
            || self.thread_info)
    }

    fn names(self) -> impl Iterator<Item = &'static str> {
        [
            (self.rich_text, "rich_text"),
            (self.backed_by_file, "backed_by_file"),
            (self.timestamp, "timestamp"),
            (self.caller_info, "caller_info"),
            (self.thread_info, "thread_info"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }
}

impl fmt::Display for RenderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.names().collect();
        f.write_str(&names.join("|"))
    }
}
