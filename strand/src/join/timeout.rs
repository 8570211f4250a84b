use std::time::{Duration, Instant};

/// How long a join waits for its tasks.
///
/// The bound applies to the join, not to the tasks: a task that misses the
/// deadline keeps running and its late result is dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Timeout {
    /// Wait until every task has completed.
    #[default]
    Infinite,

    /// Wait at most this long, measured from the start of the join.
    After(Duration),
}

impl Timeout {
    /// Returns `true` for [`Timeout::Infinite`].
    pub fn is_infinite(self) -> bool {
        matches!(self, Timeout::Infinite)
    }

    /// Deadline of a join started at `start`.
    ///
    /// Durations too large to represent as an instant behave like
    /// [`Timeout::Infinite`].
    pub fn deadline_from(self, start: Instant) -> Option<Instant> {
        match self {
            Timeout::Infinite => None,
            Timeout::After(duration) => start.checked_add(duration),
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::After(duration)
    }
}
