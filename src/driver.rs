//! Lowering driver: kernel numbering and the per-region entry point.

use crate::host::HostPlan;
use crate::region::{KernelMeta, Region};
use crate::spd::printer::{Printer, SpdOutput};
use crate::spd::SpdIr;
use anyhow::Context;
use log::info;
use std::path::Path;

/// Source of unique kernel numbers for one compilation run.
///
/// Owned by the caller and threaded through every lowering call, so two
/// runs never share hidden state and numbering is reproducible.
#[derive(Debug, Default)]
pub struct KernelCounter {
    next: u64,
}

impl KernelCounter {
    /// Start counting from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next kernel number.
    pub fn next(&mut self) -> u64 {
        let n = self.next;
        self.next += 1;
        n
    }
}

/// Everything produced by lowering one region.
#[derive(Debug)]
pub struct LoweredKernel {
    /// The built IR
    pub ir: SpdIr,
    /// Emitted module text (and wrapper, if requested)
    pub output: SpdOutput,
    /// Host orchestration call sequence
    pub host: HostPlan,
}

/// Lower one extracted region: build the IR, emit the module text for
/// the variants `meta` selects, and assemble the host call plan.
///
/// When `out_dir` is given the module files are also written there;
/// a file that cannot be written is logged and skipped.
pub fn lower_region(
    region: &Region,
    meta: &KernelMeta,
    counter: &mut KernelCounter,
    out_dir: Option<&Path>,
) -> anyhow::Result<LoweredKernel> {
    let kernel_num = counter.next();
    let ir = SpdIr::build(region, kernel_num)
        .with_context(|| format!("lowering region '{}'", region.name))?;

    let printer = Printer::new(&ir);
    let output = match out_dir {
        Some(dir) => printer.emit_to(meta, dir),
        None => printer.emit(meta),
    }
    .with_context(|| format!("emitting kernel {}", kernel_num))?;

    let host = HostPlan::new(&ir, meta);
    info!(
        "lowered region '{}' as kernel {} ({} file(s))",
        region.name,
        kernel_num,
        1 + output.wrapper.is_some() as usize
    );

    Ok(LoweredKernel { ir, output, host })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{BinOp, RegionBuilder};

    fn vadd_region() -> Region {
        let mut b = RegionBuilder::new("vadd");
        let a = b.array("A", &[4, 4]);
        let bb = b.array("B", &[4, 4]);
        let c = b.array("C", &[4, 4]);
        let mut s = b.statement(&[(0, 3), (0, 3)]);
        let la = s.load(a, &[0, 0]);
        let lb = s.load(bb, &[0, 0]);
        let sum = s.binary(BinOp::FAdd, la, lb);
        s.store(c, &[0, 0], sum);
        s.finish().finish()
    }

    #[test]
    fn test_counter_is_sequential() {
        let mut counter = KernelCounter::new();
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
    }

    #[test]
    fn test_lower_region_numbers_kernels() {
        let region = vadd_region();
        let meta = KernelMeta::scalar(0);
        let mut counter = KernelCounter::new();

        let first = lower_region(&region, &meta, &mut counter, None).unwrap();
        let second = lower_region(&region, &meta, &mut counter, None).unwrap();
        assert_eq!(first.ir.kernel_num(), 0);
        assert_eq!(second.ir.kernel_num(), 1);
        assert_eq!(second.output.kernel.filename, "kernel1.spd");
        assert_eq!(second.host.kernel, 1);
    }

    #[test]
    fn test_lower_region_rejects_bad_region() {
        let mut b = RegionBuilder::new("alias");
        let a = b.array("A", &[4]);
        let mut s = b.statement(&[(0, 3)]);
        let la = s.load(a, &[0]);
        s.store(a, &[0], la);
        let region = s.finish().finish();

        let mut counter = KernelCounter::new();
        let err = lower_region(&region, &KernelMeta::scalar(0), &mut counter, None);
        assert!(err.is_err());
        // the failed attempt still consumed a number
        assert_eq!(counter.next(), 1);
    }
}
