/// UI building blocks
///
/// View code lives here, split by what it draws:
/// - A single card slot cell (card.rs)
/// - A whole binder page with its title and card grid (binder.rs)

pub mod binder;
pub mod card;
