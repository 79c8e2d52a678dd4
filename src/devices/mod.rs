//! Built-in non-slotted I/O devices and peripheral cards.

mod keyboard;
mod language_card;
mod paddle;

pub mod diskette;

pub use keyboard::Keyboard;
pub use language_card::LanguageCard;
pub use paddle::PaddleButtons;
