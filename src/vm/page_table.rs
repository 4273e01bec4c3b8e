use bitflags::bitflags;

use crate::error::LayoutError;
use crate::vm::{TRAPFRAME, USERVEC};

bitflags! {
    pub struct PteFlag: usize {
        const VALID = 1 << 0;
        const READ = 1 << 1;
        const WRITE = 1 << 2;
        const EXEC = 1 << 3;
        const USER = 1 << 4;
        const GLOB = 1 << 5;
        const ACCES = 1 << 6;
        const DIRTY = 1 << 7;
    }
}

/// What a page table maps a single virtual page to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub pa: usize,
    pub flags: PteFlag,
}

/// Read-only view of a page table, implemented by the virtual memory
/// manager's tables so the layout can be checked against them.
pub trait Translate {
    /// The leaf mapping of the page containing `va`, or `None` if the
    /// page is not valid.
    fn translate(&self, va: usize) -> Option<Mapping>;
}

fn lookup<T: Translate + ?Sized>(table: &T, va: usize) -> Result<Mapping, LayoutError> {
    match table.translate(va) {
        Some(m) if m.flags.contains(PteFlag::VALID) => Ok(m),
        _ => Err(LayoutError::NotMapped { va }),
    }
}

/// Checks that `va` reaches the same physical frame in both tables.
///
/// The trap vector keeps executing at the same pc while satp switches
/// between the user and the kernel table, so the page it lives on must be
/// mapped identically in both.
pub fn check_shared_mapping<K, U>(kernel: &K, user: &U, va: usize) -> Result<(), LayoutError>
where
    K: Translate + ?Sized,
    U: Translate + ?Sized,
{
    let k = lookup(kernel, va)?;
    let u = lookup(user, va)?;
    if k.pa != u.pa {
        return Err(LayoutError::FrameMismatch {
            va,
            expected: k.pa,
            found: u.pa,
        });
    }
    Ok(())
}

fn check_page<T: Translate + ?Sized>(
    table: &T,
    va: usize,
    pa: usize,
    want: PteFlag,
) -> Result<(), LayoutError> {
    let m = lookup(table, va)?;
    if m.pa != pa {
        return Err(LayoutError::FrameMismatch {
            va,
            expected: pa,
            found: m.pa,
        });
    }
    if !m.flags.contains(want) || m.flags.contains(PteFlag::USER) {
        return Err(LayoutError::BadPermissions {
            va,
            flags: m.flags.bits(),
        });
    }
    Ok(())
}

/// Checks the two fixed high pages of a freshly built user page table.
///
/// `uservec_pa` is the frame holding the trap vector code and
/// `trapframe_pa` the process's own trapframe. Neither page may be
/// accessible from user mode.
pub fn check_user_table<T: Translate + ?Sized>(
    table: &T,
    uservec_pa: usize,
    trapframe_pa: usize,
) -> Result<(), LayoutError> {
    check_page(table, USERVEC, uservec_pa, PteFlag::READ | PteFlag::EXEC)?;
    check_page(table, TRAPFRAME, trapframe_pa, PteFlag::READ | PteFlag::WRITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnePage(usize, Mapping);

    impl Translate for OnePage {
        fn translate(&self, va: usize) -> Option<Mapping> {
            (va == self.0).then(|| self.1)
        }
    }

    #[test]
    fn invalid_entry_counts_as_unmapped() {
        let t = OnePage(
            USERVEC,
            Mapping {
                pa: 0x8000_1000,
                flags: PteFlag::READ | PteFlag::EXEC,
            },
        );
        assert_eq!(
            check_shared_mapping(&t, &t, USERVEC),
            Err(LayoutError::NotMapped { va: USERVEC })
        );
    }

    #[test]
    fn user_bit_is_rejected() {
        let flags = PteFlag::VALID | PteFlag::READ | PteFlag::EXEC | PteFlag::USER;
        let t = OnePage(USERVEC, Mapping { pa: 0x8000_1000, flags });
        assert_eq!(
            check_user_table(&t, 0x8000_1000, 0x8000_2000),
            Err(LayoutError::BadPermissions {
                va: USERVEC,
                flags: flags.bits()
            })
        );
    }
}
