//! Core emulation engine for an 8-bit Apple II-class machine: bus dispatch,
//! language-card banking, Disk II nibble streaming, and text/lo-res/hi-res
//! video rasterisation.
//!
//! Ported from `retro/emu` (Go). The GUI/presentation layer, configuration
//! file loading, CLI parsing, and font/image decoding are this crate's
//! embedder's responsibility; this crate owns everything from the 64 KiB
//! address space down to the rendered RGBA framebuffer.

pub mod assembly;
pub mod devices;
pub mod input;
pub mod machine;
pub mod memory;
pub mod video;

pub use assembly::{build_apple_two, PaletteOverrides, RomSet};
pub use machine::{Cpu, CpuAdapter, Machine, MachineError};
pub use memory::{BusManager, Device, RawMemory};
