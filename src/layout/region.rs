//! Region: a range of buffer offsets.

/// An ordered pair of character offsets into a text buffer.
///
/// The pair may be stored reversed (`a > b`) to keep the direction of a
/// selection drag; [`begin`](Self::begin) and [`end`](Self::end) always give
/// the ordered bounds. A zero-size region is a caret.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// Anchor offset.
    pub a: usize,
    /// Active offset.
    pub b: usize,
}

impl Region {
    /// Create a region from anchor and active offsets.
    #[inline]
    pub const fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// A zero-size region at `offset`.
    #[inline]
    pub const fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Lower bound.
    #[inline]
    pub const fn begin(&self) -> usize {
        if self.a < self.b {
            self.a
        } else {
            self.b
        }
    }

    /// Upper bound.
    #[inline]
    pub const fn end(&self) -> usize {
        if self.a < self.b {
            self.b
        } else {
            self.a
        }
    }

    /// Number of offsets spanned.
    #[inline]
    pub const fn size(&self) -> usize {
        self.end() - self.begin()
    }

    /// Whether this is a caret.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.a == self.b
    }

    /// Whether `offset` lies within the region, both ends included.
    #[inline]
    pub const fn contains(&self, offset: usize) -> bool {
        offset >= self.begin() && offset <= self.end()
    }

    /// Whether `other` lies entirely within this region.
    #[inline]
    pub const fn covers(&self, other: Self) -> bool {
        other.begin() >= self.begin() && other.end() <= self.end()
    }

    /// Smallest region containing both.
    #[must_use]
    pub fn cover(&self, other: Self) -> Self {
        Self::new(self.begin().min(other.begin()), self.end().max(other.end()))
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_ignore_direction() {
        for (a, b) in [(3, 9), (9, 3), (4, 4)] {
            let r = Region::new(a, b);
            assert!(r.begin() <= r.end());
            assert_eq!(r.size(), r.end() - r.begin());
        }
        assert_eq!(Region::new(9, 3).begin(), 3);
        assert_eq!(Region::new(9, 3).size(), 6);
    }

    #[test]
    fn test_caret() {
        let c = Region::caret(5);
        assert!(c.is_empty());
        assert!(c.contains(5));
        assert!(!c.contains(6));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let r = Region::new(2, 5);
        assert!(r.contains(2));
        assert!(r.contains(5));
        assert!(!r.contains(1));
        assert!(!r.contains(6));
    }

    #[test]
    fn test_covers_and_cover() {
        let r = Region::new(10, 20);
        assert!(r.covers(Region::new(12, 20)));
        assert!(r.covers(Region::caret(10)));
        assert!(!r.covers(Region::new(5, 12)));
        assert_eq!(r.cover(Region::new(25, 22)), Region::new(10, 25));
        assert_eq!(r.cover(Region::caret(3)), Region::new(3, 20));
    }
}
