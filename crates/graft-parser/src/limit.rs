use std::fmt;

/// A LimitTracker enforces a particular limit within the parser. It keeps
/// track of utilization so that we can report how close to a limit we
/// approached over the lifetime of the tracker.
/// ```rust
/// use graft_parser::Parser;
///
/// let query = "{ allTweets { author { username } } }";
/// let parsed = Parser::new(query).recursion_limit(4).parse();
/// assert!(parsed.errors().is_empty());
/// // `high` is the deepest nesting reached while parsing.
/// assert_eq!(parsed.recursion_limit().high, 3);
/// ```
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct LimitTracker {
    pub(crate) current: usize,
    /// High Water mark for this limit
    pub high: usize,
    /// Limit.
    pub limit: usize,
}

impl LimitTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            current: 0,
            high: 0,
            limit,
        }
    }

    /// Return whether the limit was reached
    #[must_use]
    pub fn check_and_increment(&mut self) -> bool {
        self.current += 1;
        if self.current > self.high {
            self.high = self.current;
        }
        let reached = self.current > self.limit;
        if reached {
            // Caller is gonna return early, keep increments and decrements balanced:
            self.decrement()
        }
        reached
    }

    pub fn decrement(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

impl fmt::Debug for LimitTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "limit: {}, high: {}", self.limit, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::LimitTracker;

    #[test]
    fn tracks_high_water_mark() {
        let mut limit = LimitTracker::new(2);
        assert!(!limit.check_and_increment());
        assert!(!limit.check_and_increment());
        assert!(limit.check_and_increment());
        limit.decrement();
        limit.decrement();
        assert_eq!(limit.current, 0);
        assert_eq!(limit.high, 3);
    }
}
