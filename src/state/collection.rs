/// The collection: a user-sized list of binders
///
/// Binder count is driven by one numeric input. Resizing truncates or
/// extends the list; binders that survive a resize keep their titles and
/// slot state untouched, and removed binders drop their slots (which
/// aborts any lookups those slots still had in flight).

use super::slot::Slot;

/// Cards across one binder page
pub const SLOT_COLUMNS: usize = 5;
/// Card rows per binder page
pub const SLOT_ROWS: usize = 3;
/// Every binder holds exactly one fixed page of slots
pub const SLOTS_PER_BINDER: usize = SLOT_COLUMNS * SLOT_ROWS;
/// Hard cap on the binder count so a stray paste into the count field
/// cannot allocate millions of widgets
pub const MAX_BINDERS: usize = 100;

/// One titled page of card slots
#[derive(Debug)]
pub struct Binder {
    /// Free-text label typed by the user; no validation, not persisted
    pub title: String,
    slots: Vec<Slot>,
}

impl Binder {
    /// A fresh binder: untitled, every slot open for typing
    pub fn new() -> Self {
        Self {
            title: String::new(),
            slots: (0..SLOTS_PER_BINDER).map(|_| Slot::new()).collect(),
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

/// All binders the user is working with
#[derive(Debug, Default)]
pub struct Collection {
    binders: Vec<Binder>,
}

impl Collection {
    /// Start with no binders at all
    pub fn new() -> Self {
        Self {
            binders: Vec::new(),
        }
    }

    /// Apply the raw text of the binder-count input
    ///
    /// Anything that does not parse as a count (letters, negatives,
    /// blanks) means zero binders rather than an error.
    pub fn resize_from_input(&mut self, raw: &str) {
        let count = raw.trim().parse::<usize>().unwrap_or(0);
        self.resize(count.min(MAX_BINDERS));
    }

    /// Truncate or extend to exactly `count` binders
    ///
    /// Survivors are left alone; new binders come up fresh.
    pub fn resize(&mut self, count: usize) {
        self.binders.resize_with(count, Binder::new);
    }

    pub fn binder_count(&self) -> usize {
        self.binders.len()
    }

    /// Whether the collection is pinned at the binder cap
    ///
    /// The shell uses this to tell the user why an enormous number in
    /// the count field did not produce an enormous grid.
    pub fn at_capacity(&self) -> bool {
        self.binders.len() == MAX_BINDERS
    }

    pub fn is_empty(&self) -> bool {
        self.binders.is_empty()
    }

    pub fn binders(&self) -> &[Binder] {
        &self.binders
    }

    pub fn binder_mut(&mut self, index: usize) -> Option<&mut Binder> {
        self.binders.get_mut(index)
    }

    /// Look up one slot by binder and position
    pub fn slot(&self, binder: usize, slot: usize) -> Option<&Slot> {
        self.binders.get(binder)?.slots.get(slot)
    }

    /// Mutable slot access, range-checked
    ///
    /// Lookup completions are routed through here, so results addressed
    /// to slots removed by a resize simply find nobody home.
    pub fn slot_mut(&mut self, binder: usize, slot: usize) -> Option<&mut Slot> {
        self.binders.get_mut(binder)?.slots.get_mut(slot)
    }
}
