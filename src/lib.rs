//! # spdgen
//!
//! A middle-end that lowers extracted affine loop regions into the SPD
//! stream-dataflow representation and emits the textual module files plus
//! the host orchestration plan for spatial (FPGA-style) execution.
//!
//! ## Pipeline
//!
//! 1. An upstream extraction pass hands over a [`region::Region`]: one
//!    statement, its iteration bounds, and the memory accesses with their
//!    `{start,+,1}` subscript recurrences, plus a [`region::KernelMeta`]
//!    record (vector length, unroll count, buffer-swap flag).
//! 2. [`spd::SpdIr::build`] validates the region against the SPD model
//!    (global f32 arrays, disjoint read/write sets, one shared write
//!    domain, lockstep streams) and produces the dataflow graph with
//!    per-read stream offsets, then prunes dead nodes.
//! 3. [`spd::Printer`] serializes the IR into `kernel<N>.spd` (scalar or
//!    vectorized) and, for unroll counts above one, a `UC<c>_kernel<N>.spd`
//!    pipeline wrapper.
//! 4. [`host::HostPlan`] exposes the alloc/pack/run/unpack/free call
//!    sequence as plain data for the host-code-generation collaborator.
//!
//! ## Example
//!
//! ```
//! use spdgen::prelude::*;
//!
//! let mut b = RegionBuilder::new("vadd");
//! let a = b.array("A", &[4, 4]);
//! let bb = b.array("B", &[4, 4]);
//! let c = b.array("C", &[4, 4]);
//! let mut s = b.statement(&[(0, 3), (0, 3)]);
//! let la = s.load(a, &[0, 0]);
//! let lb = s.load(bb, &[0, 0]);
//! let sum = s.binary(BinOp::FAdd, la, lb);
//! s.store(c, &[0, 0], sum);
//! let region = s.finish().finish();
//!
//! let mut counter = KernelCounter::new();
//! let lowered = lower_region(&region, &KernelMeta::scalar(0), &mut counter, None)?;
//! assert_eq!(lowered.output.kernel.filename, "kernel0.spd");
//! assert_eq!(lowered.ir.read_stream().alloc_size(), 32);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Construction is all-or-nothing: a region either fits the supported
//! affine-kernel subset completely or lowering fails with a typed error
//! naming the violated invariant. There is no partial output.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod driver;
pub mod host;
pub mod region;
pub mod spd;
pub mod utils;

pub use driver::{lower_region, KernelCounter, LoweredKernel};
pub use utils::errors::{BuildError, EmitError, SpdError, SpdResult};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for users of the crate.
pub mod prelude {
    pub use crate::driver::{lower_region, KernelCounter, LoweredKernel};
    pub use crate::host::{HostPlan, RuntimeCall};
    pub use crate::region::{
        BinOp, ElemKind, FloatConst, KernelMeta, Operand, Region, RegionBuilder, StatementBuilder,
        SubscriptExpr,
    };
    pub use crate::spd::{ArrayInfo, DomainInfo, Printer, SpdIr, StreamInfo};
    pub use crate::utils::errors::{BuildError, EmitError, SpdError, SpdResult};
}
