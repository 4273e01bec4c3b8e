//! Core-local interruptor, which contains the machine timer.

use crate::memlayout::CLINT;

pub const CLINT_MTIMECMP: usize = CLINT + 0x4000;
// cycles since boot.
pub const CLINT_MTIME: usize = CLINT + 0xbff8;

/// Address of the timer compare register for `hart`.
///
/// Like [`crate::plic::registers_for`], the hart id is not range-checked.
#[inline]
pub const fn mtimecmp(hart: usize) -> usize {
    CLINT_MTIMECMP + 8 * hart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memlayout::CLINT_MAP_SIZE;
    use crate::param::NCPU;

    #[test]
    fn mtimecmp_per_hart() {
        assert_eq!(mtimecmp(0), 0x200_4000);
        assert_eq!(mtimecmp(1), 0x200_4008);
        for hart in 0..NCPU {
            assert_ne!(mtimecmp(hart), CLINT_MTIME);
            assert!(mtimecmp(hart) + 8 <= CLINT + CLINT_MAP_SIZE);
        }
    }
}
