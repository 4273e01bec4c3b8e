//! Kernel virtual address layout.
//!
//! The kernel direct-maps physical memory, so low kernel addresses equal
//! physical ones. The top of the address space is shared with every user
//! page table:
//!
//! ```text
//! MAXVA
//!   USERVEC    trap vector code, the same physical page everywhere
//!   TRAPFRAME  per-process saved registers
//!   kstack 0   (kernel table only)
//!   guard 0
//!   kstack 1
//!   guard 1
//!   ...
//! ```
//!
//! User memory layout, address zero first:
//!
//! ```text
//!   text
//!   original data and bss
//!   fixed-size stack
//!   expandable heap
//!   ...
//!   TRAPFRAME (p->trapframe, used by uservec)
//!   USERVEC (the same page as in the kernel)
//! ```

pub mod page_table;

use static_assertions::{const_assert, const_assert_eq};

use crate::param::{is_page_aligned, MAXVA, PAGESIZE};

// map the trap vector page to the highest address,
// in both user and kernel space.
// VirtAddr 0x3ffffff000
pub const USERVEC: usize = MAXVA - PAGESIZE;

// VirtAddr 0x3fffffe000
pub const TRAPFRAME: usize = USERVEC - PAGESIZE;

/// Highest address (exclusive) a process may grow its image to.
#[inline]
pub const fn user_top() -> usize {
    TRAPFRAME
}

const_assert!(is_page_aligned(USERVEC));
const_assert!(is_page_aligned(TRAPFRAME));
const_assert_eq!(TRAPFRAME + PAGESIZE, USERVEC);
const_assert!(USERVEC + PAGESIZE <= MAXVA);
