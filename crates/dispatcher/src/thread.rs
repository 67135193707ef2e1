//! Thread attribution for log events

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

static NEXT_THREAD_NUMBER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_NUMBER: u64 = NEXT_THREAD_NUMBER.fetch_add(1, Ordering::Relaxed);
}

/// Process-unique number of the calling thread, assigned on first use
pub fn current_thread_number() -> u64 {
    THREAD_NUMBER.with(|n| *n)
}

/// Label of the calling thread: its name when set, otherwise its number as
/// 8 lowercase hex digits
pub fn current_thread_label() -> String {
    match thread::current().name() {
        Some(name) => name.to_string(),
        None => format!("{:08x}", current_thread_number()),
    }
}
