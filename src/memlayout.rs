//! Physical memory layout
//!
//! qemu -machine virt is set up like this,
//! based on qemu's hw/riscv/virt.c:
//!
//! ```text
//! 00001000 -- boot ROM, provided by qemu
//! 02000000 -- CLINT
//! 0C000000 -- PLIC
//! 10000000 -- uart0
//! 10001000 -- virtio disk
//! 80000000 -- boot ROM jumps here in machine mode
//!             -kernel loads the kernel here
//! unused RAM after 80000000.
//! ```
//!
//! Physical addresses are mapped one-to-one into the kernel's virtual
//! address space, so everything here is also a valid kernel virtual address.

use core::fmt;

use static_assertions::{const_assert, const_assert_eq};

use crate::param::PAGESIZE;

// firmware qemu runs before jumping to KERNBASE.
pub const BOOT_ROM: usize = 0x1000;
pub const BOOT_ROM_MAP_SIZE: usize = 0xf000;

// local interrupt controller, which contains the timer.
pub const CLINT: usize = 0x200_0000;
pub const CLINT_MAP_SIZE: usize = 0x10000;

// qemu puts programmable interrupt controller here.
pub const PLIC: usize = 0x0c00_0000;
pub const PLIC_MAP_SIZE: usize = 0x40_0000;

// qemu puts UART registers here in physical memory.
pub const UART0: usize = 0x1000_0000;
pub const UART0_MAP_SIZE: usize = PAGESIZE;
pub const UART0_IRQ: usize = 10;

// virtio mmio interface
pub const VIRTIO0: usize = 0x1000_1000;
pub const VIRTIO0_MAP_SIZE: usize = PAGESIZE;
pub const VIRTIO0_IRQ: usize = 1;

// the kernel expects there to be RAM
// for use by the kernel and user pages
// from physical address 0x80000000 to PHYSTOP.
pub const KERNBASE: usize = 0x8000_0000;
pub const PHYSTOP: usize = KERNBASE + 128 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    BootRom,
    Clint,
    Plic,
    Uart,
    VirtioDisk,
    Ram,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::BootRom => "boot rom",
            RegionKind::Clint => "clint",
            RegionKind::Plic => "plic",
            RegionKind::Uart => "uart0",
            RegionKind::VirtioDisk => "virtio disk",
            RegionKind::Ram => "ram",
        };
        f.pad(name)
    }
}

/// A half-open physical range `[base, base + size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRegion {
    pub base: usize,
    pub size: usize,
    pub kind: RegionKind,
}

impl MemoryRegion {
    pub const fn new(base: usize, size: usize, kind: RegionKind) -> Self {
        Self { base, size, kind }
    }

    #[inline]
    pub const fn end(&self) -> usize {
        self.base + self.size
    }

    #[inline]
    pub const fn contains(&self, pa: usize) -> bool {
        self.base <= pa && pa < self.end()
    }

    #[inline]
    pub const fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.base < other.end() && other.base < self.end()
    }

    #[inline]
    pub const fn is_mmio(&self) -> bool {
        !matches!(self.kind, RegionKind::Ram)
    }
}

/// Every region the kernel knows about, in ascending address order.
pub const PHYSICAL_MAP: [MemoryRegion; 6] = [
    MemoryRegion::new(BOOT_ROM, BOOT_ROM_MAP_SIZE, RegionKind::BootRom),
    MemoryRegion::new(CLINT, CLINT_MAP_SIZE, RegionKind::Clint),
    MemoryRegion::new(PLIC, PLIC_MAP_SIZE, RegionKind::Plic),
    MemoryRegion::new(UART0, UART0_MAP_SIZE, RegionKind::Uart),
    MemoryRegion::new(VIRTIO0, VIRTIO0_MAP_SIZE, RegionKind::VirtioDisk),
    MemoryRegion::new(KERNBASE, PHYSTOP - KERNBASE, RegionKind::Ram),
];

pub const RAM: MemoryRegion = PHYSICAL_MAP[5];

static REGIONS: [MemoryRegion; 6] = PHYSICAL_MAP;

/// Finds the region a physical address belongs to, if any.
pub fn region_of(pa: usize) -> Option<&'static MemoryRegion> {
    REGIONS.iter().find(|r| r.contains(pa))
}

/// Returns the first pair of overlapping regions in `map`.
pub fn find_overlap(map: &[MemoryRegion]) -> Option<(MemoryRegion, MemoryRegion)> {
    for (i, a) in map.iter().enumerate() {
        for b in &map[i + 1..] {
            if a.overlaps(b) {
                return Some((*a, *b));
            }
        }
    }
    None
}

// sorted and non-empty regions cannot overlap if each one ends
// before the next one starts.
const fn is_sorted_disjoint(map: &[MemoryRegion]) -> bool {
    let mut i = 1;
    while i < map.len() {
        if map[i - 1].size == 0 || map[i - 1].end() > map[i].base {
            return false;
        }
        i += 1;
    }
    true
}

const_assert_eq!(PHYSTOP - KERNBASE, 128 * 1024 * 1024);
const_assert!(is_sorted_disjoint(&PHYSICAL_MAP));
