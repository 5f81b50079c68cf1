use std::fmt;

/// One bounded index window requested from the upstream API in a single call.
///
/// Immutable once issued; the ingestion loop derives the next window with
/// [`PageRange::advance`] instead of mutating bounds in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u64,
    end: u64,
}

impl PageRange {
    /// Returns `None` unless `1 <= start <= end`.
    pub fn new(start: u64, end: u64) -> Option<Self> {
        if start >= 1 && end >= start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// First index of the window, inclusive.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last index of the window, inclusive.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of indices covered by the window.
    pub fn window_size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// The next window: both bounds shifted forward by the window size,
    /// so `next.start == self.end + 1` and the size is preserved.
    pub fn advance(&self) -> Self {
        let size = self.window_size();
        Self {
            start: self.start + size,
            end: self.end + size,
        }
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
