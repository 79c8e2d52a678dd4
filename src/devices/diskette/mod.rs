//! Apple Disk II interface card: stepper-motor phase tracking, GCR nibble
//! streaming, and the 6-and-2 disk-image encoder.
//!
//! Ported from `retro/emu/device/diskette`.

mod card;
mod drive;
mod encoder;
mod image;
mod reader;

pub use card::DisketteCard;
pub use drive::Drive;
pub use encoder::Encoder;
pub use image::{Image, SECTORS_PER_TRACK, SECTOR_SIZE, TRACKS};
pub use reader::TrackReader;
