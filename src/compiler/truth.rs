use std::ops::{BitAnd, BitOr, Not};

/// Kleene truth value of a predicate. Comparisons against null are
/// `Unknown`; a filter or join keeps only rows that are `True`.
///
/// Variants are ordered `False < Unknown < True`, so conjunction is the
/// minimum and disjunction the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Truth {
    False,
    Unknown,
    True,
}

impl From<bool> for Truth {
    fn from(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }
}

impl BitAnd for Truth {
    type Output = Truth;

    fn bitand(self, rhs: Truth) -> Truth {
        self.min(rhs)
    }
}

impl BitOr for Truth {
    type Output = Truth;

    fn bitor(self, rhs: Truth) -> Truth {
        self.max(rhs)
    }
}

impl Not for Truth {
    type Output = Truth;

    fn not(self) -> Truth {
        match self {
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
            Truth::True => Truth::False,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Truth::{self, *};

    #[test]
    fn unknown_absorbs_only_when_undecided() {
        assert_eq!(Unknown & False, False);
        assert_eq!(Unknown & True, Unknown);
        assert_eq!(Unknown | True, True);
        assert_eq!(Unknown | False, Unknown);
        assert_eq!(!Unknown, Unknown);
        assert_eq!(!Truth::from(false), True);
    }
}
