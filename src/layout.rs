//! The whole address-space layout as one value.
//!
//! Boot code builds a [`KernelLayout`] once, checks it, and hands it to the
//! virtual memory manager and the interrupt driver instead of having them
//! read the constants directly.

use log::{debug, info, warn};

use crate::clint;
use crate::error::LayoutError;
use crate::kstack::{KernelStack, KstackLayout, StackOverflow};
use crate::memlayout::{self, MemoryRegion, RegionKind, PHYSICAL_MAP};
use crate::param;
use crate::plic::{self, PlicRegisters};
use crate::vm::{TRAPFRAME, USERVEC};

/// Page size, MAXVA and the two high pages are fixed by Sv39 and the trap
/// vector code, so they are constants rather than fields here; see
/// [`crate::param`] and [`crate::vm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelLayout {
    pub regions: [MemoryRegion; 6],
    pub ncpu: usize,
    pub nproc: usize,
    pub kstack: KstackLayout,
}

impl KernelLayout {
    /// The layout of qemu's `virt` machine.
    pub const fn qemu_virt() -> Self {
        Self {
            regions: PHYSICAL_MAP,
            ncpu: param::NCPU,
            nproc: param::NPROC,
            kstack: KstackLayout::DEFAULT,
        }
    }

    pub const fn uservec(&self) -> usize {
        USERVEC
    }

    pub const fn trapframe(&self) -> usize {
        TRAPFRAME
    }

    pub const fn registers_for(&self, hart: usize) -> PlicRegisters {
        plic::registers_for(hart)
    }

    pub const fn stack_for(&self, slot: usize) -> KernelStack {
        self.kstack.stack_for(slot)
    }

    pub fn classify_fault(&self, va: usize) -> Option<StackOverflow> {
        self.kstack.classify_fault(va, self.nproc)
    }

    /// Checks the invariants that depend on the configurable parts of the
    /// layout. The fixed ones (USERVEC/TRAPFRAME placement, disjoint PLIC
    /// registers for NCPU harts) are asserted at compile time.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let ret = self
            .check_physical()
            .and_then(|_| self.check_kstacks())
            .and_then(|_| self.check_plic());
        if let Err(err) = ret {
            warn!("layout: {}", err);
        }
        ret
    }

    fn region_end(&self, kind: RegionKind) -> Option<usize> {
        self.regions
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.end())
            .max()
    }

    fn check_physical(&self) -> Result<(), LayoutError> {
        match memlayout::find_overlap(&self.regions) {
            Some((a, b)) => Err(LayoutError::Overlap { a, b }),
            None => Ok(()),
        }
    }

    fn check_kstacks(&self) -> Result<(), LayoutError> {
        // an empty stack would put the next slot's base on this guard page.
        if self.kstack.stack_pages == 0 {
            return Err(LayoutError::EmptyStack);
        }
        let ram_end = self.region_end(RegionKind::Ram).unwrap_or(0);
        // None means the slot wrapped below address zero.
        for slot in 0..self.nproc {
            match self.kstack.checked_stack_for(slot) {
                Some(s) if s.span_start() >= ram_end && s.top() <= TRAPFRAME => {}
                _ => return Err(LayoutError::StackInRam { slot }),
            }
        }
        Ok(())
    }

    fn check_plic(&self) -> Result<(), LayoutError> {
        let plic_end = self.region_end(RegionKind::Plic).unwrap_or(0);
        for hart in 0..self.ncpu {
            let regs = plic::registers_for(hart);
            if regs.addresses().iter().any(|&r| r + 4 > plic_end) {
                return Err(LayoutError::PlicOutOfRange { hart });
            }
        }
        Ok(())
    }

    pub fn log_summary(&self) {
        info!(
            "memlayout: ram [{:#x}, {:#x}) {} MiB",
            memlayout::KERNBASE,
            memlayout::PHYSTOP,
            (memlayout::PHYSTOP - memlayout::KERNBASE) >> 20
        );
        for r in self.regions.iter() {
            debug!("memlayout: {:12} [{:#x}, {:#x})", r.kind, r.base, r.end());
        }
        info!(
            "memlayout: uservec={:#x} trapframe={:#x}",
            USERVEC, TRAPFRAME
        );
        if self.nproc > 0 {
            info!(
                "memlayout: {} kernel stacks in [{:#x}, {:#x})",
                self.nproc,
                self.kstack.lowest_stack_address(self.nproc),
                self.stack_for(0).top()
            );
        }
        for hart in 0..self.ncpu {
            let regs = self.registers_for(hart);
            debug!(
                "memlayout: hart {} plic enable={:#x} priority={:#x} claim={:#x} mtimecmp={:#x}",
                hart,
                regs.enable,
                regs.priority,
                regs.claim,
                clint::mtimecmp(hart)
            );
        }
    }
}

impl Default for KernelLayout {
    fn default() -> Self {
        Self::qemu_virt()
    }
}
