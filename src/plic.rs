//! Per-hart register addresses of the platform-level interrupt controller.
//!
//! Each hart only ever touches its own enable/priority/claim words, so
//! claim and complete need no lock shared between harts. The global
//! priority table and pending bitmap are shared; the driver owns whatever
//! locking those need.

use static_assertions::const_assert;

pub use crate::memlayout::PLIC;
use crate::param::NCPU;

// one 32-bit priority word per interrupt source.
pub const PLIC_PRIORITY: usize = PLIC;
pub const PLIC_PENDING: usize = PLIC + 0x1000;

const SENABLE: usize = 0x2080;
const SENABLE_HART: usize = 0x100;
const SPRIORITY: usize = 0x201000;
const SPRIORITY_HART: usize = 0x2000;
const SCLAIM: usize = 0x201004;

/// Supervisor-mode context registers of one hart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlicRegisters {
    pub enable: usize,
    pub priority: usize,
    pub claim: usize,
}

impl PlicRegisters {
    /// Writing the irq back to the claim register completes it.
    #[inline]
    pub const fn complete(&self) -> usize {
        self.claim
    }

    pub const fn addresses(&self) -> [usize; 3] {
        [self.enable, self.priority, self.claim]
    }

    pub fn shares_address_with(&self, other: &PlicRegisters) -> bool {
        self.addresses()
            .iter()
            .any(|a| other.addresses().contains(a))
    }
}

/// Derives the register set of `hart`.
///
/// The caller is expected to pass a hart that exists; a larger id yields
/// an address outside the controller's populated space.
#[inline]
pub const fn registers_for(hart: usize) -> PlicRegisters {
    PlicRegisters {
        enable: PLIC + SENABLE + SENABLE_HART * hart,
        priority: PLIC + SPRIORITY + SPRIORITY_HART * hart,
        claim: PLIC + SCLAIM + SPRIORITY_HART * hart,
    }
}

// no two of the first `n` harts share a register, and none of them
// lands on a global register.
const fn harts_disjoint(n: usize) -> bool {
    let mut a = 0;
    while a < n {
        let ra = registers_for(a).addresses();
        let mut i = 0;
        while i < 3 {
            if ra[i] == PLIC_PRIORITY || ra[i] == PLIC_PENDING {
                return false;
            }
            let mut b = a + 1;
            while b < n {
                let rb = registers_for(b).addresses();
                let mut j = 0;
                while j < 3 {
                    if ra[i] == rb[j] {
                        return false;
                    }
                    j += 1;
                }
                b += 1;
            }
            i += 1;
        }
        a += 1;
    }
    true
}

const_assert!(harts_disjoint(NCPU));

/// Global priority word of interrupt source `irq`.
#[inline]
pub const fn source_priority(irq: usize) -> usize {
    PLIC_PRIORITY + irq * 4
}

/// Value for a hart's enable word that enables every source in `irqs`.
pub fn enable_mask(irqs: &[usize]) -> u32 {
    irqs.iter().fold(0, |mask, irq| mask | (1 << irq))
}
