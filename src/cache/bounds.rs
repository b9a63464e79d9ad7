use {duration_str::*, std::time::*};

//
// CacheBounds
//

/// Bounds for a named cache.
///
/// [None] means unbounded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheBounds {
    /// Maximum number of entries.
    ///
    /// When exceeded, the oldest entry by insertion order is evicted.
    pub max_entries: Option<usize>,

    /// Maximum entry age.
    ///
    /// Checked lazily on read: an older entry is treated as a miss.
    pub max_age: Option<Duration>,
}

impl CacheBounds {
    /// Constructor.
    pub fn new(max_entries: Option<usize>, max_age: Option<Duration>) -> Self {
        Self {
            max_entries,
            max_age,
        }
    }

    /// Unbounded.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Whether an entry of this age is expired.
    pub fn is_expired(&self, age: Duration) -> bool {
        match self.max_age {
            Some(max_age) => {
                if age > max_age {
                    tracing::debug!("expired (age {} > {})", age.human_format(), max_age.human_format());
                    true
                } else {
                    false
                }
            }

            None => false,
        }
    }
}
