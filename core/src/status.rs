//! Accepted status code ranges for response validation.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// An ordered union of half-open status code ranges.
///
/// A code is accepted when at least one range contains it. An empty union
/// accepts nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCodeRanges {
    ranges: Cow<'static, [Range<u16>]>,
}

impl StatusCodeRanges {
    /// `[200, 300)`
    pub const SUCCESS: StatusCodeRanges = StatusCodeRanges {
        ranges: Cow::Borrowed(&[200..300]),
    };

    pub fn new(ranges: impl IntoIterator<Item = Range<u16>>) -> Self {
        Self {
            ranges: Cow::Owned(ranges.into_iter().collect()),
        }
    }

    pub fn contains(&self, code: u16) -> bool {
        self.ranges.iter().any(|range| range.contains(&code))
    }

    pub fn ranges(&self) -> &[Range<u16>] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl From<Range<u16>> for StatusCodeRanges {
    fn from(range: Range<u16>) -> Self {
        Self::new([range])
    }
}

impl<const N: usize> From<[Range<u16>; N]> for StatusCodeRanges {
    fn from(ranges: [Range<u16>; N]) -> Self {
        Self::new(ranges)
    }
}

impl From<Vec<Range<u16>>> for StatusCodeRanges {
    fn from(ranges: Vec<Range<u16>>) -> Self {
        Self {
            ranges: Cow::Owned(ranges),
        }
    }
}

impl fmt::Display for StatusCodeRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            return f.write_str("(none)");
        }
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "[{}, {})", range.start, range.end)?;
        }
        Ok(())
    }
}
