pub const PAGESIZE: usize = 4096;
pub const PAGESHIFT: usize = 12;

// one beyond the highest possible virtual address.
// MAXVA is actually one bit less than the max allowed by
// Sv39, to avoid having to sign-extend virtual addresses
// that have the high bit set.
// VirtAddr 0x4000000000
pub const MAXVA: usize = 1 << (9 + 9 + 9 + 12 - 1);

pub const NCPU: usize = 8;
pub const NPROC: usize = 64;

#[inline]
pub const fn pg_round_down(addr: usize) -> usize {
    addr & !(PAGESIZE - 1)
}

#[inline]
pub const fn is_page_aligned(addr: usize) -> bool {
    addr & (PAGESIZE - 1) == 0
}

static_assertions::const_assert!(PAGESIZE.is_power_of_two());
static_assertions::const_assert_eq!(1 << PAGESHIFT, PAGESIZE);
