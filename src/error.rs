use core::fmt;

use crate::memlayout::MemoryRegion;

/// A broken layout invariant.
///
/// None of the address derivations fail; these come out of the boot-time
/// checks and out of comparing the layout with real page tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    Overlap { a: MemoryRegion, b: MemoryRegion },
    EmptyStack,
    StackInRam { slot: usize },
    PlicOutOfRange { hart: usize },
    NotMapped { va: usize },
    FrameMismatch { va: usize, expected: usize, found: usize },
    BadPermissions { va: usize, flags: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::Overlap { a, b } => write!(
                f,
                "{} [{:#x}, {:#x}) overlaps {} [{:#x}, {:#x})",
                a.kind,
                a.base,
                a.end(),
                b.kind,
                b.base,
                b.end()
            ),
            LayoutError::EmptyStack => f.write_str("kernel stacks need at least one page"),
            LayoutError::StackInRam { slot } => write!(
                f,
                "kernel stack {} does not fit between the direct-mapped ram and TRAPFRAME",
                slot
            ),
            LayoutError::PlicOutOfRange { hart } => {
                write!(f, "plic registers of hart {} lie outside the plic", hart)
            }
            LayoutError::NotMapped { va } => write!(f, "va={:#x} is not mapped", va),
            LayoutError::FrameMismatch { va, expected, found } => write!(
                f,
                "va={:#x} maps to pa={:#x}, expected pa={:#x}",
                va, found, expected
            ),
            LayoutError::BadPermissions { va, flags } => {
                write!(f, "va={:#x} has wrong permissions {:#x}", va, flags)
            }
        }
    }
}
