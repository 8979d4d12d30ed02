/// The per-slot lookup state machine
///
/// Each card slot owns its query text, its place in the lookup lifecycle,
/// and the image it displays. Transitions are pure: anything that touches
/// the outside world (starting a lookup, moving keyboard focus) is returned
/// as an Effect for the shell to carry out, which keeps the whole machine
/// testable without a window or a network.
///
/// Concurrent lookups are tamed with sequence numbers. Every commit takes
/// a fresh number from a process-wide counter and every completion carries
/// the number it was issued under; a completion that does not match the
/// slot's newest commit is dropped on the floor. One shared counter means
/// a number is never reused, so a slot created later at the same grid
/// address cannot mistake a dead predecessor's result for its own.

use std::sync::atomic::{AtomicU64, Ordering};

use iced::task;
use iced::widget::image;

use crate::search::{LookupError, ResolvedCard};

/// Where a slot is in its query-to-image lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// An empty query was committed; the slot rests on the fallback card
    Idle,
    /// The input is open, waiting for the user to commit a query
    Editing,
    /// A lookup is in flight; the previous image stays up meanwhile
    Searching,
    /// A lookup succeeded and its image is committed
    Resolved,
    /// A lookup failed; fallback card shown, input re-armed for a retry
    Failed,
}

/// What a slot currently displays
///
/// Total by construction: a slot never shows nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardImage {
    /// No image has ever been applied to this slot
    CardBack,
    /// The fixed card used for resets and failed lookups
    Fallback,
    /// A resolved card image at this URL
    Remote(String),
}

/// A side effect the shell must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do
    None,
    /// Put keyboard focus back into this slot's input
    FocusInput,
    /// Launch a lookup for this query, tagged with this sequence number
    StartLookup { query: String, seq: u64 },
}

/// Source of sequence numbers for the whole process
///
/// Issued numbers start at 1, so the 0 a fresh slot holds can never
/// match a completion.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(1);

/// Draw the next sequence number
fn next_seq() -> u64 {
    NEXT_SEQ.fetch_add(1, Ordering::Relaxed)
}

/// One card slot
#[derive(Debug)]
pub struct Slot {
    /// The user's query text, mirrored live from the input widget
    query: String,
    state: SlotState,
    image: CardImage,
    /// Artwork for a Remote image, wrapped once as an iced handle
    /// (handles are identified by id, so one is created per download
    /// and reused every frame)
    artwork: Option<image::Handle>,
    /// Sequence number of this slot's newest commit; completions tagged
    /// with anything else are stale
    latest_seq: u64,
    /// Abort handles for every lookup still in flight, keyed by the
    /// sequence number each was issued under
    lookups: Vec<(u64, task::Handle)>,
}

impl Slot {
    /// A fresh slot: input open and empty, card back behind it
    pub fn new() -> Self {
        Self {
            query: String::new(),
            state: SlotState::Editing,
            image: CardImage::CardBack,
            artwork: None,
            latest_seq: 0,
            lookups: Vec::new(),
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn image(&self) -> &CardImage {
        &self.image
    }

    /// Downloaded artwork for a resolved slot, if it has any
    pub fn artwork(&self) -> Option<&image::Handle> {
        self.artwork.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the query input should be on screen
    pub fn input_visible(&self) -> bool {
        matches!(self.state, SlotState::Editing | SlotState::Failed)
    }

    /// Mirror a keystroke from the input widget
    pub fn set_query(&mut self, text: String) {
        self.query = text;
    }

    /// Commit the current query text
    ///
    /// An empty query is an explicit reset: the slot goes idle on the
    /// fallback card. Anything else starts a lookup and hides the input
    /// before the outcome is known.
    pub fn submit_query(&mut self) -> Effect {
        // Every commit supersedes whatever is still in flight, including
        // a reset racing an earlier search
        self.latest_seq = next_seq();

        if self.query.is_empty() {
            self.state = SlotState::Idle;
            self.image = CardImage::Fallback;
            self.artwork = None;
            Effect::None
        } else {
            self.state = SlotState::Searching;
            Effect::StartLookup {
                query: self.query.clone(),
                seq: self.latest_seq,
            }
        }
    }

    /// Remember the abort handle for the lookup just launched
    ///
    /// Superseded lookups stay tracked too: while the slot lives they
    /// run to completion and die at the sequence check rather than being
    /// aborted, but destroying the slot aborts every one of them.
    pub fn track_lookup(&mut self, seq: u64, handle: task::Handle) {
        self.lookups.push((seq, handle));
    }

    /// Apply a lookup completion, unless it is stale
    pub fn lookup_finished(
        &mut self,
        seq: u64,
        result: Result<ResolvedCard, LookupError>,
    ) -> Effect {
        // Whatever the outcome, the task that carried this number is done
        self.lookups.retain(|(tagged, _)| *tagged != seq);

        if seq != self.latest_seq {
            return Effect::None;
        }

        match result {
            Ok(card) => {
                self.artwork = Some(image::Handle::from_bytes(card.artwork));
                self.image = CardImage::Remote(card.image_url);
                // Commits the image even if the user re-opened the
                // editor while the lookup was in flight
                self.state = SlotState::Resolved;
                Effect::None
            }
            Err(_) => {
                self.artwork = None;
                self.image = CardImage::Fallback;
                self.state = SlotState::Failed;
                Effect::FocusInput
            }
        }
    }

    /// A click on the card face: re-open the input for editing
    ///
    /// The displayed image stays up until a new query commits.
    pub fn open_editor(&mut self) -> Effect {
        self.state = SlotState::Editing;
        Effect::FocusInput
    }
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Slot {
    /// A removed slot takes every lookup it still has in flight with it
    fn drop(&mut self) {
        for (_, handle) in &self.lookups {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(url: &str) -> ResolvedCard {
        ResolvedCard {
            name: "Test Card".to_string(),
            image_url: url.to_string(),
            artwork: vec![0xFF, 0xD8, 0xFF],
        }
    }

    /// Commit a query and unpack the sequence number of its lookup
    fn start_lookup(slot: &mut Slot, text: &str) -> u64 {
        slot.set_query(text.to_string());
        match slot.submit_query() {
            Effect::StartLookup { seq, .. } => seq,
            other => panic!("expected a lookup to start, got {:?}", other),
        }
    }

    #[test]
    fn test_fresh_slot_edits_over_the_card_back() {
        let slot = Slot::new();
        assert_eq!(slot.state(), SlotState::Editing);
        assert_eq!(slot.image(), &CardImage::CardBack);
        assert!(slot.input_visible());
        assert_eq!(slot.query(), "");
    }

    #[test]
    fn test_empty_submit_resets_to_fallback() {
        let mut slot = Slot::new();
        let effect = slot.submit_query();
        assert_eq!(effect, Effect::None);
        assert_eq!(slot.state(), SlotState::Idle);
        assert_eq!(slot.image(), &CardImage::Fallback);
        assert!(!slot.input_visible());
    }

    #[test]
    fn test_empty_submit_resets_a_resolved_slot() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "lightning bolt");
        slot.lookup_finished(seq, Ok(found("X")));
        assert_eq!(slot.state(), SlotState::Resolved);

        // Clearing the query and committing wipes the resolved image
        slot.set_query(String::new());
        slot.submit_query();
        assert_eq!(slot.state(), SlotState::Idle);
        assert_eq!(slot.image(), &CardImage::Fallback);
        assert!(slot.artwork().is_none());
    }

    #[test]
    fn test_submit_hides_input_and_keeps_previous_image() {
        let mut slot = Slot::new();
        slot.set_query("lightning bolt".to_string());
        match slot.submit_query() {
            Effect::StartLookup { query, seq } => {
                assert_eq!(query, "lightning bolt");
                assert!(seq > 0);
            }
            other => panic!("expected a lookup to start, got {:?}", other),
        }
        assert_eq!(slot.state(), SlotState::Searching);
        assert!(!slot.input_visible());
        // The previous image stays up while the lookup runs
        assert_eq!(slot.image(), &CardImage::CardBack);
    }

    #[test]
    fn test_success_commits_the_resolved_image() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "lightning bolt");
        let effect = slot.lookup_finished(seq, Ok(found("X")));
        assert_eq!(effect, Effect::None);
        assert_eq!(slot.state(), SlotState::Resolved);
        assert_eq!(slot.image(), &CardImage::Remote("X".to_string()));
        assert!(slot.artwork().is_some());
        assert!(!slot.input_visible());
    }

    #[test]
    fn test_failure_falls_back_and_refocuses() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "xyzzy");
        let effect = slot.lookup_finished(seq, Err(LookupError::Status(404)));
        assert_eq!(effect, Effect::FocusInput);
        assert_eq!(slot.state(), SlotState::Failed);
        assert_eq!(slot.image(), &CardImage::Fallback);
        assert!(slot.input_visible());
    }

    #[test]
    fn test_zero_results_counts_as_failure() {
        // A 200 with no matches must not strand the slot in Searching
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "qqqqqq");
        slot.lookup_finished(seq, Err(LookupError::NoResults));
        assert_eq!(slot.state(), SlotState::Failed);
        assert_eq!(slot.image(), &CardImage::Fallback);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut slot = Slot::new();
        let first = start_lookup(&mut slot, "one");
        let second = start_lookup(&mut slot, "two");
        assert!(second > first);

        // The slow first lookup lands after the second was committed
        let effect = slot.lookup_finished(first, Ok(found("stale")));
        assert_eq!(effect, Effect::None);
        assert_eq!(slot.state(), SlotState::Searching);
        assert_eq!(slot.image(), &CardImage::CardBack);

        // The second lookup is still the latest and applies normally
        slot.lookup_finished(second, Ok(found("fresh")));
        assert_eq!(slot.image(), &CardImage::Remote("fresh".to_string()));
    }

    #[test]
    fn test_reset_outruns_a_slow_lookup() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "bolt");

        // The user clears the slot before the lookup comes back
        slot.set_query(String::new());
        slot.submit_query();
        assert_eq!(slot.state(), SlotState::Idle);

        // The late result must not resurrect the search
        let effect = slot.lookup_finished(seq, Ok(found("late")));
        assert_eq!(effect, Effect::None);
        assert_eq!(slot.state(), SlotState::Idle);
        assert_eq!(slot.image(), &CardImage::Fallback);
    }

    #[test]
    fn test_click_reopens_editor_without_clearing_image() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "bolt");
        slot.lookup_finished(seq, Ok(found("X")));

        let effect = slot.open_editor();
        assert_eq!(effect, Effect::FocusInput);
        assert_eq!(slot.state(), SlotState::Editing);
        assert!(slot.input_visible());
        // Image and query text survive for correction
        assert_eq!(slot.image(), &CardImage::Remote("X".to_string()));
        assert_eq!(slot.query(), "bolt");
    }

    #[test]
    fn test_success_lands_even_after_editor_reopened() {
        let mut slot = Slot::new();
        let seq = start_lookup(&mut slot, "bolt");
        slot.open_editor();

        // Still the latest commit, so the result applies and the
        // input closes again
        slot.lookup_finished(seq, Ok(found("X")));
        assert_eq!(slot.state(), SlotState::Resolved);
        assert!(!slot.input_visible());
    }

    #[test]
    fn test_identical_resubmit_runs_a_fresh_lookup() {
        let mut slot = Slot::new();
        let first = start_lookup(&mut slot, "bolt");
        slot.lookup_finished(first, Ok(found("X")));

        // Same text again: a new lookup starts with a newer sequence
        let second = start_lookup(&mut slot, "bolt");
        assert!(second > first);
        assert_eq!(slot.state(), SlotState::Searching);
        // The old image stays while the fresh lookup runs
        assert_eq!(slot.image(), &CardImage::Remote("X".to_string()));

        slot.lookup_finished(second, Ok(found("X")));
        assert_eq!(slot.state(), SlotState::Resolved);
        assert_eq!(slot.image(), &CardImage::Remote("X".to_string()));
    }

    #[test]
    fn test_sequence_numbers_are_never_reused_across_slots() {
        let mut first = Slot::new();
        let a = start_lookup(&mut first, "bolt");
        drop(first);

        // A slot built later at the same grid address draws fresh numbers
        let mut second = Slot::new();
        let b = start_lookup(&mut second, "bolt");
        assert_ne!(a, b);
    }

    #[test]
    fn test_replacement_slot_ignores_predecessors_lookup() {
        // Two lookups race in a slot, then its binder is removed and a
        // new one is created at the same grid address
        let mut doomed = Slot::new();
        let superseded = start_lookup(&mut doomed, "one");
        start_lookup(&mut doomed, "two");
        drop(doomed);

        let mut replacement = Slot::new();
        let current = start_lookup(&mut replacement, "three");

        // If the dead slot's result is somehow still delivered to the
        // cell, the replacement must not adopt it
        let effect = replacement.lookup_finished(superseded, Ok(found("stale")));
        assert_eq!(effect, Effect::None);
        assert_eq!(replacement.state(), SlotState::Searching);
        assert_eq!(replacement.image(), &CardImage::CardBack);

        // Its own lookup still lands normally
        replacement.lookup_finished(current, Ok(found("fresh")));
        assert_eq!(replacement.state(), SlotState::Resolved);
        assert_eq!(replacement.image(), &CardImage::Remote("fresh".to_string()));
    }
}
