//! Kernel stack placement.
//!
//! Kernel stacks live beneath USERVEC, one slot per process, each with an
//! invalid guard page below it. The guard page is never mapped, so running
//! off the bottom of a stack page-faults instead of scribbling over the
//! neighbouring stack.

use static_assertions::const_assert;

use crate::memlayout::PHYSTOP;
use crate::param::{pg_round_down, NPROC, PAGESHIFT, PAGESIZE};
use crate::vm::USERVEC;

/// One process's kernel stack and the guard page under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelStack {
    pub base: usize,
    pub size: usize,
    pub guard: usize,
}

impl KernelStack {
    /// Initial stack pointer; the stack grows down from here.
    #[inline]
    pub const fn top(&self) -> usize {
        self.base + self.size
    }

    #[inline]
    pub const fn stack_contains(&self, va: usize) -> bool {
        self.base <= va && va < self.top()
    }

    #[inline]
    pub const fn guard_contains(&self, va: usize) -> bool {
        self.guard <= va && va < self.base
    }

    /// Lowest address covered by this slot, guard page included.
    #[inline]
    pub const fn span_start(&self) -> usize {
        self.guard
    }
}

/// A fault address that landed in a kernel stack's guard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOverflow {
    pub slot: usize,
    pub va: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KstackLayout {
    pub stack_pages: usize,
}

impl KstackLayout {
    /// One stack page plus one guard page per process.
    pub const DEFAULT: KstackLayout = KstackLayout::new(1);

    pub const fn new(stack_pages: usize) -> Self {
        Self { stack_pages }
    }

    /// Distance between two consecutive slots.
    #[inline]
    pub const fn stride(&self) -> usize {
        (self.stack_pages + 1) * PAGESIZE
    }

    /// Kernel stack of `slot`.
    ///
    /// The slot is not range-checked: the process table must keep it small
    /// enough that the slot still fits below USERVEC, which holds for any
    /// slot below NPROC. Use [`KstackLayout::checked_stack_for`] when the
    /// slot count is not known to fit.
    pub const fn stack_for(&self, slot: usize) -> KernelStack {
        let base = USERVEC - (slot + 1) * self.stride();
        KernelStack {
            base,
            size: self.stack_pages * PAGESIZE,
            guard: base - PAGESIZE,
        }
    }

    /// Like [`KstackLayout::stack_for`], but `None` if the slot and its
    /// guard page would wrap below address zero.
    pub fn checked_stack_for(&self, slot: usize) -> Option<KernelStack> {
        let stride = self.stack_pages.checked_add(1)?.checked_mul(PAGESIZE)?;
        let span = slot.checked_add(1)?.checked_mul(stride)?;
        let base = USERVEC.checked_sub(span)?;
        Some(KernelStack {
            base,
            size: self.stack_pages * PAGESIZE,
            guard: base.checked_sub(PAGESIZE)?,
        })
    }

    /// Lower bound of the area used by `nproc` slots. `nproc` must be at
    /// least one.
    pub const fn lowest_stack_address(&self, nproc: usize) -> usize {
        self.stack_for(nproc - 1).span_start()
    }

    /// Tells whether a faulting `va` hit the guard page of one of the
    /// first `nproc` slots.
    pub fn classify_fault(&self, va: usize, nproc: usize) -> Option<StackOverflow> {
        let page = pg_round_down(va);
        if page >= USERVEC {
            return None;
        }
        // pages below USERVEC; slot s has its guard at (s + 1) * per_slot + 1.
        let below = (USERVEC - page) >> PAGESHIFT;
        let per_slot = self.stack_pages.saturating_add(1);
        if below <= per_slot || (below - 1) % per_slot != 0 {
            return None;
        }
        let slot = (below - 1) / per_slot - 1;
        (slot < nproc).then(|| StackOverflow { slot, va })
    }
}

impl Default for KstackLayout {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Kernel stack of process slot `slot`, with the default one-page stacks.
#[inline]
pub const fn stack_for(slot: usize) -> KernelStack {
    KstackLayout::DEFAULT.stack_for(slot)
}

/// Overflow check for the default layout across the whole process table.
pub fn classify_fault(va: usize) -> Option<StackOverflow> {
    KstackLayout::DEFAULT.classify_fault(va, NPROC)
}

const_assert!(KstackLayout::DEFAULT.lowest_stack_address(NPROC) > PHYSTOP);
