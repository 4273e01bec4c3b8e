//! Address-space layout of the kernel on qemu's RISC-V `virt` machine.
//!
//! Physical map, per-hart interrupt controller registers, the high pages
//! shared by every page table, and kernel stack placement. Everything is
//! plain address arithmetic over fixed constants and can be called from
//! any hart at any time.

#![cfg_attr(not(test), no_std)]

pub mod clint;
pub mod error;
pub mod kstack;
pub mod layout;
pub mod memlayout;
pub mod param;
pub mod plic;
pub mod vm;

pub use error::LayoutError;
pub use kstack::{stack_for, KernelStack, KstackLayout, StackOverflow};
pub use layout::KernelLayout;
pub use memlayout::{
    MemoryRegion, RegionKind, KERNBASE, PHYSTOP, PLIC, UART0, UART0_IRQ, VIRTIO0, VIRTIO0_IRQ,
};
pub use param::{MAXVA, PAGESIZE};
pub use plic::{registers_for, PlicRegisters, PLIC_PENDING, PLIC_PRIORITY};
pub use vm::page_table::{Mapping, PteFlag, Translate};
pub use vm::{TRAPFRAME, USERVEC};
