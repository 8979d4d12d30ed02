/// One card slot cell
///
/// A slot draws as its card artwork (or placeholder art) with the query
/// input stacked on top whenever the slot is editable. The whole cell is
/// click-sensitive so a committed card can be reopened for correction;
/// clicks that land on the input itself are captured by it and never
/// reach the cell.

use iced::widget::{container, image, mouse_area, stack, text_input, Space};
use iced::{Element, Length};

use crate::state::slot::Slot;
use crate::{Message, PlaceholderArt};

/// Card cell width in logical pixels
pub const CARD_WIDTH: f32 = 150.0;
/// Height follows the physical card's 1.39 aspect ratio
pub const CARD_HEIGHT: f32 = 209.0;

/// Stable widget id for one slot's query input
///
/// Focus commands (mount focus, refocus after a failed lookup) are
/// addressed through these ids.
pub fn slot_input_id(binder: usize, slot: usize) -> text_input::Id {
    text_input::Id::new(format!("slot-{}-{}", binder, slot))
}

/// Build the cell for one slot
pub fn view<'a>(
    binder: usize,
    index: usize,
    slot: &'a Slot,
    art: &'a PlaceholderArt,
) -> Element<'a, Message> {
    // The card face: real artwork once its bytes have arrived, an empty
    // frame until then
    let face: Element<'a, Message> = match art.for_slot(slot) {
        Some(handle) => image(handle.clone())
            .width(CARD_WIDTH)
            .height(CARD_HEIGHT)
            .into(),
        None => container(Space::new(Length::Shrink, Length::Shrink))
            .width(CARD_WIDTH)
            .height(CARD_HEIGHT)
            .style(container::rounded_box)
            .into(),
    };

    let cell: Element<'a, Message> = if slot.input_visible() {
        let input = text_input("card name", slot.query())
            .id(slot_input_id(binder, index))
            .on_input(move |text| Message::QueryTyped {
                binder,
                slot: index,
                text,
            })
            .on_submit(Message::QuerySubmitted {
                binder,
                slot: index,
            })
            .size(13)
            .width(CARD_WIDTH - 16.0);

        stack![
            face,
            container(input).center_x(CARD_WIDTH).center_y(CARD_HEIGHT),
        ]
        .into()
    } else {
        face
    };

    mouse_area(cell)
        .on_press(Message::SlotPressed {
            binder,
            slot: index,
        })
        .into()
}
