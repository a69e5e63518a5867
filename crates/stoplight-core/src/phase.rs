//! The two-valued signal [`Phase`].

use std::fmt;

/// Signal phase of a light.
///
/// A light alternates between the two members forever; [`Phase::toggled`]
/// is the only transition rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Stop. The initial phase of a freshly constructed cycler.
    #[default]
    Red,
    /// Go.
    Green,
}

impl Phase {
    /// The phase that follows `self`.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    /// Whether this is [`Phase::Red`].
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    /// Whether this is [`Phase::Green`].
    pub const fn is_green(self) -> bool {
        matches!(self, Self::Green)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_red() {
        assert_eq!(Phase::default(), Phase::Red);
    }

    #[test]
    fn toggle_alternates() {
        assert_eq!(Phase::Red.toggled(), Phase::Green);
        assert_eq!(Phase::Green.toggled(), Phase::Red);
    }

    #[test]
    fn predicates_match_variant() {
        assert!(Phase::Red.is_red());
        assert!(!Phase::Red.is_green());
        assert!(Phase::Green.is_green());
        assert!(!Phase::Green.is_red());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Phase::Red.to_string(), "red");
        assert_eq!(Phase::Green.to_string(), "green");
    }

    fn arb_phase() -> impl Strategy<Value = Phase> {
        prop_oneof![Just(Phase::Red), Just(Phase::Green)]
    }

    proptest! {
        #[test]
        fn toggle_parity(start in arb_phase(), n in 0usize..64) {
            let mut p = start;
            for _ in 0..n {
                let next = p.toggled();
                prop_assert_ne!(next, p);
                p = next;
            }
            // An even number of toggles returns to the start.
            prop_assert_eq!(p == start, n % 2 == 0);
        }
    }
}
