extern crate riscv_memlayout;
use std::collections::BTreeMap;

use riscv_memlayout::vm::page_table::{check_shared_mapping, check_user_table};
use riscv_memlayout::*;

const TRAMPOLINE_PA: usize = KERNBASE + 0x7000;

#[derive(Default)]
struct FakeTable(BTreeMap<usize, Mapping>);

impl FakeTable {
    fn map(&mut self, va: usize, pa: usize, flags: PteFlag) {
        let mapping = Mapping {
            pa,
            flags: flags | PteFlag::VALID,
        };
        assert!(self.0.insert(va, mapping).is_none(), "remap {:#x}", va);
    }
}

impl Translate for FakeTable {
    fn translate(&self, va: usize) -> Option<Mapping> {
        self.0.get(&param::pg_round_down(va)).copied()
    }
}

fn kernel_table() -> FakeTable {
    let mut kpt = FakeTable::default();
    kpt.map(USERVEC, TRAMPOLINE_PA, PteFlag::READ | PteFlag::EXEC);
    for slot in 0..param::NPROC {
        let s = stack_for(slot);
        kpt.map(s.base, PHYSTOP - (slot + 1) * PAGESIZE, PteFlag::READ | PteFlag::WRITE);
    }
    kpt
}

fn user_table(trapframe_pa: usize) -> FakeTable {
    let mut upt = FakeTable::default();
    upt.map(USERVEC, TRAMPOLINE_PA, PteFlag::READ | PteFlag::EXEC);
    upt.map(TRAPFRAME, trapframe_pa, PteFlag::READ | PteFlag::WRITE);
    upt
}

#[test]
fn high_pages() {
    assert_eq!(TRAPFRAME + PAGESIZE, USERVEC);
    assert!(USERVEC + PAGESIZE <= MAXVA);
    assert_eq!(USERVEC % PAGESIZE, 0);
    assert_eq!(TRAPFRAME % PAGESIZE, 0);
}

#[test]
fn ram_is_128_mib() {
    assert_eq!(PHYSTOP - KERNBASE, 128 * 1024 * 1024);
}

#[test]
fn physical_regions_are_disjoint() {
    let map = memlayout::PHYSICAL_MAP;
    for (i, a) in map.iter().enumerate() {
        for b in &map[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a.kind, b.kind);
        }
    }
}

#[test]
fn uservec_is_shared_by_every_process() {
    let kpt = kernel_table();
    for p in 0..8 {
        let tf = KERNBASE + 0x10_0000 + p * PAGESIZE;
        let upt = user_table(tf);
        assert_eq!(check_shared_mapping(&kpt, &upt, USERVEC), Ok(()));
        // the whole page, not only its first byte.
        assert_eq!(check_shared_mapping(&kpt, &upt, USERVEC + 0xffc), Ok(()));
        assert_eq!(check_user_table(&upt, TRAMPOLINE_PA, tf), Ok(()));
    }
}

#[test]
fn moved_uservec_is_caught() {
    let kpt = kernel_table();
    let mut upt = FakeTable::default();
    upt.map(USERVEC, TRAMPOLINE_PA + PAGESIZE, PteFlag::READ | PteFlag::EXEC);
    assert_eq!(
        check_shared_mapping(&kpt, &upt, USERVEC),
        Err(LayoutError::FrameMismatch {
            va: USERVEC,
            expected: TRAMPOLINE_PA,
            found: TRAMPOLINE_PA + PAGESIZE,
        })
    );
}

#[test]
fn missing_trapframe_is_caught() {
    let mut upt = FakeTable::default();
    upt.map(USERVEC, TRAMPOLINE_PA, PteFlag::READ | PteFlag::EXEC);
    assert_eq!(
        check_user_table(&upt, TRAMPOLINE_PA, KERNBASE + 0x10_0000),
        Err(LayoutError::NotMapped { va: TRAPFRAME })
    );
}

#[test]
fn read_only_trapframe_is_caught() {
    let mut upt = FakeTable::default();
    upt.map(USERVEC, TRAMPOLINE_PA, PteFlag::READ | PteFlag::EXEC);
    upt.map(TRAPFRAME, KERNBASE + 0x10_0000, PteFlag::READ);
    assert!(matches!(
        check_user_table(&upt, TRAMPOLINE_PA, KERNBASE + 0x10_0000),
        Err(LayoutError::BadPermissions { va, .. }) if va == TRAPFRAME
    ));
}

#[test]
fn guard_pages_stay_unmapped() {
    let kpt = kernel_table();
    for slot in 0..param::NPROC {
        let s = stack_for(slot);
        assert!(kpt.translate(s.guard).is_none());
        assert!(kpt.translate(s.base).is_some());
    }
}

#[test]
fn default_layout_validates() {
    let layout = KernelLayout::default();
    assert_eq!(layout.validate(), Ok(()));
    assert_eq!(layout.registers_for(1), registers_for(1));
    assert_eq!(layout.stack_for(5), stack_for(5));
    layout.log_summary();
}

#[test]
fn errors_render() {
    let err = LayoutError::NotMapped { va: USERVEC };
    assert_eq!(err.to_string(), "va=0x3ffffff000 is not mapped");
}
