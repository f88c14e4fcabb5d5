use serde::{Deserialize, Serialize};

/// Confirmation attempts granted per code.
pub const MAX_CONFIRM_ATTEMPTS: u8 = 3;
/// How long the backend keeps a code valid.
pub const CODE_TTL_MINUTES: u32 = 15;

/// Local view of how many confirmations are left for the current code. The
/// backend is the authority; this only stops the client from submitting once
/// it knows the code is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptCounter(u8);

impl AttemptCounter {
    #[must_use]
    pub fn new() -> Self {
        Self(MAX_CONFIRM_ATTEMPTS)
    }

    /// Adopts the count reported by `/verification/attempts`, capped at the maximum.
    #[must_use]
    pub fn from_server(remaining: u32) -> Self {
        Self(u8::try_from(remaining).map_or(MAX_CONFIRM_ATTEMPTS, |n| n.min(MAX_CONFIRM_ATTEMPTS)))
    }

    #[must_use]
    pub fn remaining(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_exhausted(self) -> bool {
        self.0 == 0
    }

    pub fn record_failure(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    /// A fresh code restores the full allowance.
    pub fn reset(&mut self) {
        self.0 = MAX_CONFIRM_ATTEMPTS;
    }
}

impl Default for AttemptCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{AttemptCounter, MAX_CONFIRM_ATTEMPTS};

    #[test]
    fn counts_down_to_exhaustion() {
        let mut counter = AttemptCounter::new();
        assert_eq!(counter.remaining(), MAX_CONFIRM_ATTEMPTS);

        for expected in (0..MAX_CONFIRM_ATTEMPTS).rev() {
            counter.record_failure();
            assert_eq!(counter.remaining(), expected);
        }
        assert!(counter.is_exhausted());

        counter.record_failure();
        assert_eq!(counter.remaining(), 0);

        counter.reset();
        assert!(!counter.is_exhausted());
        assert_eq!(counter.remaining(), MAX_CONFIRM_ATTEMPTS);
    }

    #[test]
    fn server_count_is_capped() {
        assert_eq!(AttemptCounter::from_server(1).remaining(), 1);
        assert_eq!(AttemptCounter::from_server(0).remaining(), 0);
        assert_eq!(AttemptCounter::from_server(9).remaining(), MAX_CONFIRM_ATTEMPTS);
        assert_eq!(AttemptCounter::from_server(u32::MAX).remaining(), MAX_CONFIRM_ATTEMPTS);
    }
}
