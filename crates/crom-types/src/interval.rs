//! Cardinality intervals.
//!
//! Written the UML way: `1..*`, `0..1`, `2..2` or a single number `3` meaning `3..3`.

use std::fmt;
use std::str::FromStr;

/// Upper end of an [`Interval`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    Finite(u64),
    Unbounded,
}

impl Bound {
    pub fn admits(self, n: u64) -> bool {
        match self {
            Bound::Finite(max) => n <= max,
            Bound::Unbounded => true,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Finite(n) => write!(f, "{n}"),
            Bound::Unbounded => f.write_str("*"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    #[error("lower bound {lower} exceeds upper bound {upper}")]
    Inverted { lower: u64, upper: u64 },
    #[error("malformed interval `{0}` (expected `i..j`, `i..*` or `n`)")]
    Malformed(String),
}

/// Closed interval `lower..upper` over the natural numbers; `lower <= upper` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    lower: u64,
    upper: Bound,
}

impl Interval {
    /// `0..*`
    pub const ANY: Interval = Interval {
        lower: 0,
        upper: Bound::Unbounded,
    };

    pub fn new(lower: u64, upper: Bound) -> Result<Self, IntervalError> {
        if let Bound::Finite(max) = upper
            && lower > max
        {
            return Err(IntervalError::Inverted { lower, upper: max });
        }
        Ok(Self { lower, upper })
    }

    pub fn exactly(n: u64) -> Self {
        Self {
            lower: n,
            upper: Bound::Finite(n),
        }
    }

    pub fn at_least(n: u64) -> Self {
        Self {
            lower: n,
            upper: Bound::Unbounded,
        }
    }

    pub fn lower(&self) -> u64 {
        self.lower
    }

    pub fn upper(&self) -> Bound {
        self.upper
    }

    pub fn contains(&self, n: u64) -> bool {
        self.lower <= n && self.upper.admits(n)
    }

    /// A lower bound of at least one: the constrained thing must exist.
    pub fn is_mandatory(&self) -> bool {
        self.lower >= 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lower, self.upper)
    }
}

impl FromStr for Interval {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || IntervalError::Malformed(s.to_string());
        let s = s.trim();
        if s == "*" {
            return Ok(Interval::ANY);
        }
        let Some((lo, hi)) = s.split_once("..") else {
            let n = s.parse::<u64>().map_err(|_| malformed())?;
            return Ok(Interval::exactly(n));
        };
        let lower = lo.trim().parse::<u64>().map_err(|_| malformed())?;
        let upper = match hi.trim() {
            "*" => Bound::Unbounded,
            n => Bound::Finite(n.parse::<u64>().map_err(|_| malformed())?),
        };
        Interval::new(lower, upper)
    }
}
