//! Elapsed-time header field
//!
//! Layout: `[ {days}d {secs}s.{millis} ]`, fixed width for any elapsed time
//! below [`MAX_DAYS`] days. The day segment is blank for the first day.

use std::time::Duration;

use contracts::{LogError, TimestampWidths};

/// First day count that can no longer be encoded
pub const MAX_DAYS: u128 = 10_000;

const MILLIS_PER_DAY: u128 = 86_400_000;
const SECS_PER_DAY: u128 = 86_400;

/// Encoder for the elapsed-time field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimestampFormat {
    widths: TimestampWidths,
}

impl TimestampFormat {
    /// # Errors
    /// `LogError::ConfigValidation` when a width is out of range
    pub fn new(widths: TimestampWidths) -> Result<Self, LogError> {
        widths.validate()?;
        Ok(Self { widths })
    }

    pub fn widths(&self) -> TimestampWidths {
        self.widths
    }

    /// Encode `elapsed`, or `None` once it reaches [`MAX_DAYS`] days
    pub fn encode(&self, elapsed: Duration) -> Option<String> {
        let total_ms = elapsed.as_millis();
        let days = total_ms / MILLIS_PER_DAY;
        if days >= MAX_DAYS {
            return None;
        }
        let secs = (total_ms / 1000) % SECS_PER_DAY;
        let millis = total_ms % 1000;

        let mut out = String::with_capacity(self.width());
        out.push_str("[ ");
        if days > 0 {
            // `- 1` leaves room for the `d` suffix
            pad(&mut out, ' ', self.widths.days.saturating_sub(1 + digits(days)));
            out.push_str(&days.to_string());
            out.push('d');
        } else {
            pad(&mut out, ' ', self.widths.days);
        }
        out.push(' ');
        pad(&mut out, ' ', self.widths.seconds.saturating_sub(digits(secs)));
        out.push_str(&secs.to_string());
        out.push_str("s.");
        pad(&mut out, '0', self.widths.millis.saturating_sub(digits(millis)));
        out.push_str(&millis.to_string());
        out.push_str(" ]");
        Some(out)
    }

    /// Rendered width of any in-range timestamp
    pub fn width(&self) -> usize {
        // "[ " + days + " " + secs + "s." + millis + " ]"
        2 + self.widths.days + 1 + self.widths.seconds + 2 + self.widths.millis + 2
    }
}

fn pad(out: &mut String, fill: char, count: usize) {
    out.extend(std::iter::repeat(fill).take(count));
}

fn digits(n: u128) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}
