/// One binder page
///
/// A page is a bordered box holding the binder's title input and its
/// fixed card grid. The grid is a Wrap whose available width fits exactly
/// one row of five cards, so fifteen slots always lay out as 5x3.

use iced::widget::{column, container, text_input};
use iced::{Element, Length};
use iced_aw::Wrap;

use crate::state::collection::{Binder, SLOT_COLUMNS};
use crate::ui::card;
use crate::{Message, PlaceholderArt};

/// Space between card cells
const CARD_SPACING: f32 = 10.0;
/// Padding inside the page border
const PAGE_PADDING: f32 = 16.0;
/// Closes the page around exactly one row of cards
const PAGE_WIDTH: f32 = SLOT_COLUMNS as f32 * card::CARD_WIDTH
    + (SLOT_COLUMNS as f32 - 1.0) * CARD_SPACING
    + 2.0 * PAGE_PADDING;

/// Build one binder page
pub fn view<'a>(
    index: usize,
    binder: &'a Binder,
    art: &'a PlaceholderArt,
) -> Element<'a, Message> {
    let title = text_input("Name this binder", &binder.title)
        .on_input(move |title| Message::BinderTitleChanged {
            binder: index,
            title,
        })
        .size(16)
        .width(Length::Fixed(320.0));

    let mut grid = Wrap::new().spacing(CARD_SPACING).line_spacing(CARD_SPACING);
    for (slot_index, slot) in binder.slots().iter().enumerate() {
        grid = grid.push(card::view(index, slot_index, slot, art));
    }

    container(column![title, grid].spacing(12.0))
        .padding(PAGE_PADDING)
        .width(Length::Fixed(PAGE_WIDTH))
        .style(container::bordered_box)
        .into()
}
