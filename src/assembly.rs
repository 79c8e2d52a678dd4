//! Wires RAM, ROM, video, built-in I/O, and peripheral cards into a
//! ready-to-run [`Machine`].
//!
//! Ported from `retro/emu/virtual/garage.go`. ROM bytes, the decoded
//! character font, and (optionally) the Disk II boot ROM are supplied by
//! the caller — reading them from disk, an embedded asset bundle, or
//! anywhere else is outside this crate's scope.

use crate::devices::diskette::DisketteCard;
use crate::devices::{Keyboard, LanguageCard, PaddleButtons};
use crate::machine::{CpuAdapter, Machine};
use crate::memory::{BusManager, Device, RawMemory};
use crate::video::{palette, Font, HiRes, LoRes, Text, VideoDriver};

const ROM_SIZE: usize = 0x800;

/// The six 2 KiB ROM regions the onboard firmware occupies, named after the
/// address each is loaded at. Each slice must be exactly `ROM_SIZE` bytes.
pub struct RomSet<'a> {
    pub f800: &'a [u8],
    pub f000: &'a [u8],
    pub e800: &'a [u8],
    pub e000: &'a [u8],
    pub d800: &'a [u8],
    pub d000: &'a [u8],
}

/// Optional overrides for the default LoRes/HiRes palettes. `None` uses
/// [`palette::LORES`]/[`palette::HIRES`].
#[derive(Default)]
pub struct PaletteOverrides {
    pub lores: Option<[u32; 16]>,
    pub hires: Option<[u32; 8]>,
}

fn load_roms(mem: &RawMemory, roms: &RomSet) -> Result<(), String> {
    for (name, addr, data) in [
        ("F800", 0xF800u16, roms.f800),
        ("F000", 0xF000, roms.f000),
        ("E800", 0xE800, roms.e800),
        ("E000", 0xE000, roms.e000),
        ("D800", 0xD800, roms.d800),
        ("D000", 0xD000, roms.d000),
    ] {
        if data.len() != ROM_SIZE {
            return Err(format!(
                "ROM region {name} must be {ROM_SIZE} bytes, got {}",
                data.len()
            ));
        }
        mem.load(addr, data);
    }
    Ok(())
}

/// Zero-page cells Applesoft BASIC expects seeded at reset, plus the
/// paddle-wait-routine patch at `$FB28` — lifted verbatim from the
/// reference's literal `copy` statements.
fn seed_zero_page(mem: &RawMemory) {
    mem.load(0x0067, &[0x01, 0x08, 0x03, 0x08, 0x03, 0x08, 0x03, 0x08]);
    mem.load(0x0073, &[0x00, 0x96]);
    mem.load(0x00AF, &[0x03, 0x08]);
    mem.load(0xFB28, &[0xA8, 0x60]); // TAY, RTS
}

/// Assembles an Apple II-class machine: RAM, the six firmware ROM regions,
/// text/lo-res/hi-res video over the standard page addresses, the keyboard
/// and paddle built-ins, the Language Card in slot 0, and — when
/// `disk_ii_rom` is supplied — the Disk II interface card in slot 6.
///
/// Disk image insertion is a deliberately separate, later step: obtain the
/// mounted card via the returned `Machine`'s bus and call
/// [`crate::devices::diskette::Drive::insert`] on the drive you want to
/// load, mirroring `garage.go::NewAppleTwo` and `dsk.go::insertDisks` being
/// distinct steps in the reference. Returns an error if any ROM region is
/// the wrong size.
pub fn build_apple_two(
    roms: &RomSet,
    font: Font,
    disk_ii_rom: Option<&[u8]>,
    palettes: &PaletteOverrides,
    mhz: f64,
) -> Result<Machine<CpuAdapter>, String> {
    let mem = RawMemory::new();

    let lores_palette = palettes.lores.unwrap_or(palette::LORES);
    let hires_palette = palettes.hires.unwrap_or(palette::HIRES);

    let text = Text::new(mem.clone(), 0x0400, 0x0800, font);
    let lores = LoRes::new(mem.clone(), 0x0400, 0x0800, &lores_palette);
    let hires = HiRes::new(mem.clone(), 0x2000, 0x4000, &hires_palette);
    let video = VideoDriver::new(text, lores, hires);

    let keyboard = Keyboard::new(mem.clone());
    let paddles = PaddleButtons::new(mem.clone());

    let builtins: Vec<Box<dyn Device>> =
        vec![Box::new(video), Box::new(keyboard), Box::new(paddles)];
    let mut bus = BusManager::new(mem.clone(), builtins);

    load_roms(&mem, roms)?;
    seed_zero_page(&mem);

    bus.mount(0, Box::new(LanguageCard::new()));

    if let Some(rom) = disk_ii_rom {
        log::debug!("mounting Disk II interface card in slot 6");
        bus.mount(6, Box::new(DisketteCard::new(rom)));
    }

    let cpu = CpuAdapter::new(bus);
    let hz = (mhz * 1024.0 * 1024.0) as u32;
    Ok(Machine::new(cpu, hz, mem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Font {
        Font::from_bitmap(&[0u8; 256 * 8], [0xFF, 0xFF, 0xFF, 0xFF]).unwrap()
    }

    fn roms() -> [Vec<u8>; 6] {
        [
            vec![0u8; ROM_SIZE],
            vec![0u8; ROM_SIZE],
            vec![0u8; ROM_SIZE],
            vec![0u8; ROM_SIZE],
            vec![0u8; ROM_SIZE],
            vec![0u8; ROM_SIZE],
        ]
    }

    #[test]
    fn rejects_undersized_rom_region() {
        let rs = roms();
        let short = vec![0u8; 10];
        let set = RomSet {
            f800: &short,
            f000: &rs[1],
            e800: &rs[2],
            e000: &rs[3],
            d800: &rs[4],
            d000: &rs[5],
        };
        let result = build_apple_two(&set, font(), None, &PaletteOverrides::default(), 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn builds_a_machine_without_a_disk_card() {
        let rs = roms();
        let set = RomSet {
            f800: &rs[0],
            f000: &rs[1],
            e800: &rs[2],
            e000: &rs[3],
            d800: &rs[4],
            d000: &rs[5],
        };
        let machine = build_apple_two(&set, font(), None, &PaletteOverrides::default(), 1.0);
        assert!(machine.is_ok());
    }

    #[test]
    fn zero_page_seed_lands_at_expected_cells() {
        let rs = roms();
        let set = RomSet {
            f800: &rs[0],
            f000: &rs[1],
            e800: &rs[2],
            e000: &rs[3],
            d800: &rs[4],
            d000: &rs[5],
        };
        let mut machine =
            build_apple_two(&set, font(), None, &PaletteOverrides::default(), 1.0).unwrap();
        let bus = machine.cpu_mut().bus();
        assert_eq!(bus.raw().read(0x67, 0x00), 0x01);
        assert_eq!(bus.raw().read(0x28, 0xFB), 0xA8);
    }
}
