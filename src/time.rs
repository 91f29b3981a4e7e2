use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
pub struct Tick(pub u64);

impl Tick {
    /// Even ticks give landings priority over takeoffs.
    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }

    /// The tick after this one, or `None` once the counter is exhausted.
    pub fn next(self) -> Option<Tick> {
        self.0.checked_add(1).map(Tick)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T+{:04}", self.0)
    }
}
