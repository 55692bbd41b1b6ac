//! In-buffer find over the active document's surface text.
//!
//! Plain substring matching, recomputed against the surface after every
//! edit. Navigation wraps around.

#[derive(Debug, Default)]
pub struct FindState {
    query: String,
    /// Byte offsets of match starts, ascending.
    matches: Vec<usize>,
    /// Index into `matches` of the match the cursor was last sent to.
    current: Option<usize>,
}

impl FindState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn set_query(&mut self, query: impl Into<String>, haystack: &str) {
        self.query = query.into();
        self.current = None;
        self.refresh(haystack);
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
    }

    /// Recompute matches after the surface changed. The current index is
    /// clamped rather than reset so navigation stays roughly in place.
    pub fn refresh(&mut self, haystack: &str) {
        if self.query.is_empty() {
            self.matches.clear();
            self.current = None;
            return;
        }
        self.matches = haystack.match_indices(&self.query).map(|(i, _)| i).collect();
        self.current = match self.current {
            _ if self.matches.is_empty() => None,
            Some(c) => Some(c.min(self.matches.len() - 1)),
            None => None,
        };
    }

    /// Jump to the first match at or after `from`, wrapping to the first
    /// match overall. Returns the match's byte offset.
    pub fn seek(&mut self, from: usize) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let idx = self
            .matches
            .iter()
            .position(|&m| m >= from)
            .unwrap_or(0);
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    /// Advance to the next match, wrapping around.
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let idx = match self.current {
            Some(c) => (c + 1) % self.matches.len(),
            None => 0,
        };
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    /// Step back to the previous match, wrapping around.
    pub fn prev(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        let idx = match self.current {
            Some(c) => (c + len - 1) % len,
            None => len - 1,
        };
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    /// Human-readable position, e.g. `2/5`, for the status bar.
    pub fn summary(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }
        Some(match self.current {
            Some(c) => format!("{}/{}", c + 1, self.matches.len()),
            None => format!("0/{}", self.matches.len()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_finds_the_match_at_or_after_the_cursor() {
        let mut find = FindState::new();
        find.set_query("ab", "ab..ab..ab");

        assert_eq!(find.seek(0), Some(0));
        assert_eq!(find.seek(1), Some(4));
        assert_eq!(find.seek(5), Some(8));
        // Past the last match: wrap to the first.
        assert_eq!(find.seek(9), Some(0));
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut find = FindState::new();
        find.set_query("x", "x-x-x");

        assert_eq!(find.next(), Some(0));
        assert_eq!(find.next(), Some(2));
        assert_eq!(find.next(), Some(4));
        assert_eq!(find.next(), Some(0));
        assert_eq!(find.prev(), Some(4));
    }

    #[test]
    fn refresh_after_an_edit_keeps_navigation_in_range() {
        let mut find = FindState::new();
        find.set_query("x", "x-x-x");
        find.next();
        find.next();
        find.next();

        find.refresh("x");
        assert_eq!(find.match_count(), 1);
        assert_eq!(find.summary().as_deref(), Some("1/1"));
    }

    #[test]
    fn no_matches_yields_a_zero_summary_and_no_jumps() {
        let mut find = FindState::new();
        find.set_query("zzz", "hello");

        assert_eq!(find.seek(0), None);
        assert_eq!(find.next(), None);
        assert_eq!(find.summary().as_deref(), Some("0/0"));
    }

    #[test]
    fn clearing_deactivates_the_search() {
        let mut find = FindState::new();
        find.set_query("a", "aaa");
        find.clear();
        assert!(!find.is_active());
        assert_eq!(find.summary(), None);
    }
}
