//! Scope guard for cleanup that must run on every exit path.

/// Runs its cleanup closure on drop, so terminal restoration happens on
/// normal returns and panics alike.
pub struct Context<F: FnOnce()> {
    cleanup: Option<F>,
}

impl<F: FnOnce()> Context<F> {
    pub fn with(cleanup: F) -> Self {
        Self {
            cleanup: Some(cleanup),
        }
    }
}

impl<F: FnOnce()> Drop for Context<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn cleanup_runs_on_drop() {
        let ran = Cell::new(false);
        {
            let _guard = Context::with(|| ran.set(true));
            assert!(!ran.get());
        }
        assert!(ran.get());
    }
}
