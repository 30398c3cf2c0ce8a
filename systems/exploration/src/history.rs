//! Cursor-addressed log of simulation snapshots.

/// Append-only log with a movable cursor.
///
/// The log always holds at least its initial entry. Appending while the
/// cursor is rewound first discards every entry after the cursor, so a new
/// action replaces the abandoned future instead of branching from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepHistory<T> {
    entries: Vec<T>,
    cursor: usize,
    paused: bool,
}

impl<T> StepHistory<T> {
    /// Creates a log holding `initial` at index zero.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
            paused: false,
        }
    }

    /// Truncates everything after the cursor, appends `entry` and moves the cursor onto it.
    pub fn append(&mut self, entry: T) -> &T {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
        &self.entries[self.cursor]
    }

    /// Moves the cursor to `index`, returning the entry stored there.
    ///
    /// Out-of-range indices leave the cursor where it was.
    pub fn seek(&mut self, index: usize) -> Option<&T> {
        let entry = self.entries.get(index)?;
        self.cursor = index;
        Some(entry)
    }

    /// Moves the cursor one entry back, unless it is already on the first entry.
    pub fn step_back(&mut self) -> Option<&T> {
        let index = self.cursor.checked_sub(1)?;
        self.seek(index)
    }

    /// Moves the cursor one entry forward, unless it is already on the last entry.
    pub fn step_forward(&mut self) -> Option<&T> {
        self.seek(self.cursor + 1)
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    /// Entry stored at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Every recorded entry, including any future beyond the cursor.
    #[must_use]
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Index of the entry under the cursor.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the log is empty; it never is, since the initial entry is kept.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reports whether the cursor sits on the newest entry.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.cursor + 1 == self.entries.len()
    }

    /// Freezes automatic ticking; manual stepping stays available.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Lets automatic ticking continue from the current cursor.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Reports whether automatic ticking is frozen.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::StepHistory;

    fn filled(count: u32) -> StepHistory<u32> {
        let mut history = StepHistory::new(0);
        for value in 1..count {
            let _ = history.append(value);
        }
        history
    }

    #[test]
    fn append_moves_the_cursor_to_the_end() {
        let history = filled(5);
        assert_eq!(history.len(), 5);
        assert_eq!(history.cursor(), 4);
        assert_eq!(*history.current(), 4);
        assert!(history.is_at_end());
    }

    #[test]
    fn seek_is_idempotent() {
        let mut history = filled(8);
        assert_eq!(history.seek(3), Some(&3));
        let once = history.clone();
        assert_eq!(history.seek(3), Some(&3));
        assert_eq!(history, once);
        assert_eq!(history.len(), 8);
    }

    #[test]
    fn append_after_seek_discards_the_future() {
        let mut history = filled(8);
        let k = 3;
        let _ = history.seek(k);
        let _ = history.append(99);
        assert_eq!(history.len(), k + 2);
        assert_eq!(history.entries(), &[0, 1, 2, 3, 99]);
    }

    #[test]
    fn stepping_stops_at_both_ends() {
        let mut history = filled(3);
        assert_eq!(history.step_forward(), None);
        assert_eq!(history.step_back(), Some(&1));
        assert_eq!(history.step_back(), Some(&0));
        assert_eq!(history.step_back(), None);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.step_forward(), Some(&1));
    }

    #[test]
    fn seek_out_of_range_keeps_the_cursor() {
        let mut history = filled(3);
        let _ = history.seek(1);
        assert_eq!(history.seek(10), None);
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn pause_and_resume_toggle_the_flag() {
        let mut history = filled(2);
        assert!(!history.is_paused());
        history.pause();
        assert!(history.is_paused());
        assert_eq!(history.step_back(), Some(&0));
        history.resume();
        assert!(!history.is_paused());
        assert_eq!(history.cursor(), 0);
    }
}
