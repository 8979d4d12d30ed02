use iced::widget::{column, container, image, row, scrollable, text, text_input, Column};
use iced::{Alignment, Element, Length, Task, Theme};

// Declare the application modules
mod config;
mod search;
mod state;
mod ui;

use config::Config;
use search::{LookupError, ResolvedCard, SearchClient};
use state::collection::{Collection, SLOTS_PER_BINDER};
use state::slot::{CardImage, Effect, Slot};
use ui::card::slot_input_id;

/// Which fixed placeholder image a startup fetch was for
#[derive(Debug, Clone, Copy)]
enum Placeholder {
    CardBack,
    FallbackCard,
}

/// The two fixed images every slot can fall back on
///
/// Downloaded once at startup and shared by every cell; slots whose art
/// has not arrived yet draw as empty frames.
#[derive(Debug, Default)]
struct PlaceholderArt {
    card_back: Option<image::Handle>,
    fallback: Option<image::Handle>,
}

impl PlaceholderArt {
    /// The artwork a slot should draw right now, if its bytes exist
    fn for_slot<'a>(&'a self, slot: &'a Slot) -> Option<&'a image::Handle> {
        match slot.image() {
            CardImage::Remote(_) => slot.artwork(),
            CardImage::Fallback => self.fallback.as_ref(),
            CardImage::CardBack => self.card_back.as_ref(),
        }
    }
}

/// Main application state
struct CardBinder {
    /// Every binder and card slot the user is working with
    collection: Collection,
    /// Shared Scryfall client; each lookup task clones it
    client: SearchClient,
    /// Raw text of the binder-count input
    count_input: String,
    /// Startup-fetched card back and fallback art
    placeholders: PlaceholderArt,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User edited the binder-count input
    BinderCountChanged(String),
    /// User edited a binder's title
    BinderTitleChanged { binder: usize, title: String },
    /// User typed in a slot's query input
    QueryTyped {
        binder: usize,
        slot: usize,
        text: String,
    },
    /// User committed a slot's query with Enter
    QuerySubmitted { binder: usize, slot: usize },
    /// User clicked a slot's card face
    SlotPressed { binder: usize, slot: usize },
    /// A lookup finished, possibly out of order or for a removed slot
    LookupFinished {
        binder: usize,
        slot: usize,
        seq: u64,
        result: Result<ResolvedCard, LookupError>,
    },
    /// A placeholder image download finished
    PlaceholderLoaded {
        which: Placeholder,
        result: Result<Vec<u8>, LookupError>,
    },
}

impl CardBinder {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::default();
        let client = SearchClient::new(&config);

        let mut collection = Collection::new();
        collection.resize(1);
        println!(
            "🃏 Card Binder ready with {} binder of {} slots",
            collection.binder_count(),
            SLOTS_PER_BINDER
        );

        let status = format!("Ready. 1 binder, {} card slots.", SLOTS_PER_BINDER);

        // Fetch the two fixed images every slot can fall back on
        let fetch_card_back = fetch_placeholder(
            client.clone(),
            config.card_back_url.clone(),
            Placeholder::CardBack,
        );
        let fetch_fallback = fetch_placeholder(
            client.clone(),
            config.fallback_card_url.clone(),
            Placeholder::FallbackCard,
        );

        (
            CardBinder {
                collection,
                client,
                count_input: "1".to_string(),
                placeholders: PlaceholderArt::default(),
                status,
            },
            Task::batch([
                fetch_card_back,
                fetch_fallback,
                // Drop the user straight into the first slot
                text_input::focus(slot_input_id(0, 0)),
            ]),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BinderCountChanged(raw) => {
                let previous = self.collection.binder_count();
                self.collection.resize_from_input(&raw);
                self.count_input = raw;

                let count = self.collection.binder_count();
                // Pinned at the cap, the count field can show more
                // binders than the grid actually holds
                self.status = if self.collection.at_capacity() {
                    format!(
                        "📚 {} binders (the maximum), {} card slots.",
                        count,
                        count * SLOTS_PER_BINDER
                    )
                } else {
                    format!(
                        "📚 {} binders, {} card slots.",
                        count,
                        count * SLOTS_PER_BINDER
                    )
                };

                // Growth drops the user into the first fresh slot
                if count > previous {
                    return text_input::focus(slot_input_id(previous, 0));
                }
                Task::none()
            }
            Message::BinderTitleChanged { binder, title } => {
                if let Some(page) = self.collection.binder_mut(binder) {
                    page.title = title;
                }
                Task::none()
            }
            Message::QueryTyped { binder, slot, text } => {
                if let Some(cell) = self.collection.slot_mut(binder, slot) {
                    cell.set_query(text);
                }
                Task::none()
            }
            Message::QuerySubmitted { binder, slot } => self.submit_slot(binder, slot),
            Message::SlotPressed { binder, slot } => {
                match self.collection.slot_mut(binder, slot) {
                    Some(cell) => match cell.open_editor() {
                        Effect::FocusInput => text_input::focus(slot_input_id(binder, slot)),
                        _ => Task::none(),
                    },
                    None => Task::none(),
                }
            }
            Message::LookupFinished {
                binder,
                slot,
                seq,
                result,
            } => {
                // Log the outcome before the result moves into the slot;
                // the status line is a log, not a mirror of slot state
                match &result {
                    Ok(card) => {
                        println!("✅ Resolved \"{}\" -> {}", card.name, card.image_url);
                        self.status = format!("✅ Found \"{}\".", card.name);
                    }
                    Err(error) => {
                        eprintln!("⚠️  Lookup failed: {}", error);
                        self.status = format!("⚠️  Lookup failed: {}", error);
                    }
                }

                match self.collection.slot_mut(binder, slot) {
                    Some(cell) => match cell.lookup_finished(seq, result) {
                        Effect::FocusInput => text_input::focus(slot_input_id(binder, slot)),
                        _ => Task::none(),
                    },
                    None => {
                        // The collection shrank while this lookup ran
                        println!("📦 Dropping a result for a removed slot");
                        Task::none()
                    }
                }
            }
            Message::PlaceholderLoaded { which, result } => {
                match result {
                    Ok(bytes) => {
                        let handle = image::Handle::from_bytes(bytes);
                        match which {
                            Placeholder::CardBack => self.placeholders.card_back = Some(handle),
                            Placeholder::FallbackCard => self.placeholders.fallback = Some(handle),
                        }
                        println!("🎨 Placeholder art ready: {:?}", which);
                    }
                    Err(error) => {
                        // Affected slots keep their empty frames; lookups
                        // still work without the placeholder art
                        eprintln!("⚠️  Could not fetch {:?} art: {}", which, error);
                        self.status = format!("⚠️  Could not fetch placeholder art: {}", error);
                    }
                }
                Task::none()
            }
        }
    }

    /// Commit one slot's query and launch its lookup if one is needed
    fn submit_slot(&mut self, binder: usize, slot: usize) -> Task<Message> {
        let cell = match self.collection.slot_mut(binder, slot) {
            Some(cell) => cell,
            None => return Task::none(),
        };

        match cell.submit_query() {
            Effect::StartLookup { query, seq } => {
                self.status = format!("🔍 Searching for \"{}\"...", query);

                let client = self.client.clone();
                let (task, handle) = Task::perform(
                    async move { client.find_card(&query).await },
                    move |result| Message::LookupFinished {
                        binder,
                        slot,
                        seq,
                        result,
                    },
                )
                .abortable();

                // The slot keeps every handle so destroying it aborts
                // whatever is still running
                cell.track_lookup(seq, handle);
                task
            }
            Effect::FocusInput => text_input::focus(slot_input_id(binder, slot)),
            Effect::None => {
                // An empty commit resets the slot to the fallback card
                self.status = format!("Cleared a slot in binder {}.", binder + 1);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let header = row![
            text("Card Binder").size(32),
            text("Binders:").size(16),
            text_input("0", &self.count_input)
                .on_input(Message::BinderCountChanged)
                .width(80.0),
            text(&self.status).size(14),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let pages: Element<Message> = if self.collection.is_empty() {
            container(text("Set a binder count above to start sorting your collection.").size(16))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        } else {
            let list = Column::with_children(
                self.collection
                    .binders()
                    .iter()
                    .enumerate()
                    .map(|(index, binder)| ui::binder::view(index, binder, &self.placeholders)),
            )
            .spacing(24);

            scrollable(
                container(list)
                    .width(Length::Fill)
                    .center_x(Length::Fill)
                    .padding(24),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
        };

        column![header, pages].spacing(16).padding(20).into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Card Binder",
        CardBinder::update,
        CardBinder::view,
    )
    .theme(CardBinder::theme)
    .centered()
    .run_with(CardBinder::new)
}

/// Kick off one placeholder image download as a background task
fn fetch_placeholder(client: SearchClient, url: String, which: Placeholder) -> Task<Message> {
    Task::perform(
        async move { client.fetch_artwork(&url).await },
        move |result| Message::PlaceholderLoaded { which, result },
    )
}
