//! Code fence tracking for line-based preprocessing.
//!
//! Extensions that scan source lines (e.g. abbreviation definitions) must
//! not touch lines inside fenced code blocks.

/// Tracks code fence state during line-by-line processing.
///
/// Fences use three or more backticks or tildes. The closing fence must
/// use the same character and be at least as long as the opening fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    /// Opening fence character and length, while inside a fence.
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Update fence state for a line.
    ///
    /// Returns `true` if the line is a fence marker (opening or closing).
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((ch, len)) => {
                if closes_fence(trimmed, ch, len) {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                if let Some(opened) = opens_fence(trimmed) {
                    self.open = Some(opened);
                    return true;
                }
                false
            }
        }
    }
}

/// Detect an opening fence, returning its character and length.
fn opens_fence(trimmed: &str) -> Option<(char, usize)> {
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }

    let count = trimmed.chars().take_while(|&c| c == first).count();
    (count >= 3).then_some((first, count))
}

/// Check whether a line closes the current fence.
///
/// Requires the same character, at least the opening length, and nothing
/// but whitespace after the fence run.
fn closes_fence(trimmed: &str, expected: char, min_len: usize) -> bool {
    let count = trimmed.chars().take_while(|&c| c == expected).count();
    count >= min_len && trimmed[count..].chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_fence_initially() {
        let tracker = FenceTracker::new();
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());

        assert!(!tracker.update("fn main() {}"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("~~~"));
        assert!(tracker.in_fence());

        assert!(tracker.update("~~~"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_mismatched_close_ignored() {
        let mut tracker = FenceTracker::new();

        tracker.update("````");
        assert!(tracker.in_fence());

        // Shorter run does not close
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());

        // Different character does not close
        assert!(!tracker.update("~~~~"));
        assert!(tracker.in_fence());

        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_short_run_is_not_a_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.update("``inline``"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_close_with_trailing_content_ignored() {
        let mut tracker = FenceTracker::new();
        tracker.update("```");
        assert!(!tracker.update("``` extra"));
        assert!(tracker.in_fence());
    }
}
