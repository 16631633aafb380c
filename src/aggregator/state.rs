use std::fmt;

/// Where one account is in its reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountPhase {
    Idle,
    ConfirmedQueried,
    PendingCountQueried,
    PendingItemsQueried,
    Skipped,
    Assembled,
}

impl AccountPhase {
    /// Forward-only transitions; there are no retries.
    pub fn can_advance_to(self, next: AccountPhase) -> bool {
        use AccountPhase::*;
        matches!(
            (self, next),
            (Idle, ConfirmedQueried)
                | (ConfirmedQueried, PendingCountQueried)
                | (PendingCountQueried, PendingItemsQueried)
                | (PendingCountQueried, Skipped)
                | (PendingItemsQueried, Assembled)
                | (Skipped, Assembled)
        )
    }
}

impl fmt::Display for AccountPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Tracks the phase of the account currently being reconciled.
#[derive(Debug)]
pub struct AccountProgress {
    index: usize,
    phase: AccountPhase,
}

impl AccountProgress {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            phase: AccountPhase::Idle,
        }
    }

    pub fn phase(&self) -> AccountPhase {
        self.phase
    }

    pub fn advance(&mut self, next: AccountPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "account #{} cannot go from {} to {}",
            self.index,
            self.phase,
            next
        );
        log::trace!("[AGGREGATOR] account #{}: {} -> {}", self.index, self.phase, next);
        self.phase = next;
    }
}

#[cfg(test)]
mod tests {
    use super::AccountPhase::*;
    use super::*;

    #[test]
    fn both_pending_paths_reach_assembled() {
        for middle in [PendingItemsQueried, Skipped] {
            let mut progress = AccountProgress::new(0);
            for next in [ConfirmedQueried, PendingCountQueried, middle, Assembled] {
                progress.advance(next);
            }
            assert_eq!(progress.phase(), Assembled);
        }
    }

    #[test]
    fn no_backward_or_skipping_transitions() {
        assert!(!Idle.can_advance_to(PendingCountQueried));
        assert!(!ConfirmedQueried.can_advance_to(Assembled));
        assert!(!PendingItemsQueried.can_advance_to(PendingCountQueried));
        assert!(!Assembled.can_advance_to(Idle));
        assert!(!PendingItemsQueried.can_advance_to(Skipped));
    }
}
