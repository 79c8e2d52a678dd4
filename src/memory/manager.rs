//! Bus manager: routes every CPU access through the device dispatch chain
//! before falling through to raw memory.
//!
//! Ported from `retro/emu/memory/manager.go`.

use super::{Device, RawMemory};

/// Presents the unified bus (`read`/`write`) the CPU sees, arbitrated across
/// mounted devices with raw memory as the fallback.
pub struct BusManager {
    mem: RawMemory,
    /// Slots 0..7, indexed directly; `None` when unoccupied.
    slots: [Option<Box<dyn Device>>; 8],
    /// Non-slotted built-ins (video driver, keyboard, paddles). Always at
    /// the tail of dispatch and never shadowed by a slot card.
    builtins: Vec<Box<dyn Device>>,
    /// Dispatch order, rebuilt on every `mount`: builtins, then occupied
    /// slots from 7 down to 0.
    order: Vec<DispatchTarget>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DispatchTarget {
    Builtin(usize),
    Slot(usize),
}

impl BusManager {
    /// Creates a manager over `mem`, with `builtins` always dispatched
    /// first and never subject to slot mounting.
    pub fn new(mem: RawMemory, builtins: Vec<Box<dyn Device>>) -> Self {
        let mut m = Self {
            mem,
            slots: Default::default(),
            builtins,
            order: Vec::new(),
        };
        m.rebuild_order();
        m
    }

    fn rebuild_order(&mut self) {
        self.order.clear();
        self.order
            .extend((0..self.builtins.len()).map(DispatchTarget::Builtin));
        for slot in (0..8).rev() {
            if self.slots[slot].is_some() {
                self.order.push(DispatchTarget::Slot(slot));
            }
        }
    }

    fn device_mut(&mut self, target: DispatchTarget) -> &mut Box<dyn Device> {
        match target {
            DispatchTarget::Builtin(i) => &mut self.builtins[i],
            DispatchTarget::Slot(s) => self.slots[s].as_mut().expect("dispatch order is stale"),
        }
    }

    /// Mounts `device` into `slot` (0..7): assigns the slot, resets the
    /// device, then rebuilds the dispatch list so higher-slot cards see
    /// addresses first.
    pub fn mount(&mut self, slot: u8, mut device: Box<dyn Device>) {
        let slot = (slot & 0x07) as usize;
        device.slot_assigned(slot as u8);
        device.reset();
        self.slots[slot] = Some(device);
        self.rebuild_order();
    }

    /// Returns the device mounted in `slot`, if any.
    pub fn slot(&self, slot: u8) -> Option<&dyn Device> {
        self.slots[(slot & 0x07) as usize].as_deref()
    }

    pub fn slot_mut(&mut self, slot: u8) -> Option<&mut (dyn Device + 'static)> {
        self.slots[(slot & 0x07) as usize].as_deref_mut()
    }

    /// Direct access to raw memory, for ROM loading and zero-page seeding.
    pub fn raw(&self) -> &RawMemory {
        &self.mem
    }

    pub fn read(&mut self, lo: u8, hi: u8) -> u8 {
        let order = self.order.clone();
        for target in order {
            if let Some(b) = self.device_mut(target).try_read(lo, hi) {
                return b;
            }
        }
        self.mem.read(lo, hi)
    }

    pub fn write(&mut self, lo: u8, hi: u8, b: u8) {
        let order = self.order.clone();
        for target in order {
            if self.device_mut(target).try_write(lo, hi, b) {
                return;
            }
        }
        // 0xC100 and above is ROM/card space: never falls through to RAM.
        if hi < 0xC1 {
            self.mem.write(lo, hi, b);
        }
    }

    /// Propagates `reset` to every mounted device, in dispatch order. Raw
    /// memory is never cleared.
    pub fn reset(&mut self) {
        let order = self.order.clone();
        for target in order {
            self.device_mut(target).reset();
        }
    }
}
