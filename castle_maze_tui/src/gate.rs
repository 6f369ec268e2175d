use std::cell::Cell;

/// Re-entrancy guard for move requests.
///
/// Directional input is shut off while a move is being processed, including
/// any door prompt it opens. Requests arriving in that window are dropped.
#[derive(Debug, Default)]
pub struct MoveGate {
    busy: Cell<bool>,
}

impl MoveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with the gate closed. Returns `None` without calling `f` if
    /// a move is already in progress.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        if self.busy.replace(true) {
            return None;
        }
        let _reopen = Reopen(&self.busy);
        Some(f())
    }
}

/// Reopens the gate when dropped, even if the move panicked.
struct Reopen<'a>(&'a Cell<bool>);

impl Drop for Reopen<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
