//! Host-side orchestration plan.
//!
//! After lowering, the host program must move array data into the linear
//! stream buffers, launch the spatial kernel, and move results back. This
//! module reads the descriptors off a built [`SpdIr`] and exposes that
//! call sequence as plain data; the host-code-generation collaborator
//! turns it into actual calls around the original call site.

use crate::region::KernelMeta;
use crate::spd::ir::{Side, SpdIr};
use serde::{Deserialize, Serialize};

/// One synthesized runtime call.
///
/// The sequence is consumed in order; every call maps to one symbol of
/// the stream runtime (see [`RuntimeCall::symbol`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeCall {
    /// Allocate the stream buffer for one side, sized in elements.
    AllocStream {
        /// Which stream to allocate
        stream: Side,
        /// Allocation size in elements
        size: u64,
    },
    /// Copy one array into its slots of the read stream.
    Pack {
        /// Name of the source array
        array: String,
        /// The array's slot within each element group
        offset: u32,
        /// Element-group width of the stream
        stride: u32,
        /// Total number of array elements to copy
        count: u64,
    },
    /// Launch the spatial kernel over the packed streams.
    RunKernel {
        /// Kernel number, matching the emitted module file
        kernel: u64,
        /// Read stream allocation size in elements
        read_size: u64,
        /// Write stream allocation size in elements
        write_size: u64,
        /// Swap the in/out buffers between runs
        switch_in_out: bool,
    },
    /// Copy one array's slots of the write stream back out.
    Unpack {
        /// Name of the destination array
        array: String,
        /// The array's slot within each element group
        offset: u32,
        /// Element-group width of the stream
        stride: u32,
        /// Total number of array elements to copy
        count: u64,
    },
    /// Release one stream buffer.
    FreeStream {
        /// Which stream to free
        stream: Side,
    },
}

impl RuntimeCall {
    /// The runtime symbol this call binds to.
    pub fn symbol(&self) -> &'static str {
        match self {
            RuntimeCall::AllocStream { .. } => "__spd_alloc_stream",
            RuntimeCall::Pack { .. } => "__spd_pack_contiguous",
            RuntimeCall::RunKernel { .. } => "__spd_run_kernel",
            RuntimeCall::Unpack { .. } => "__spd_unpack_contiguous",
            RuntimeCall::FreeStream { .. } => "__spd_free_stream",
        }
    }
}

/// The full orchestration sequence for one lowered kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostPlan {
    /// Kernel number the plan belongs to
    pub kernel: u64,
    /// Calls in execution order
    pub calls: Vec<RuntimeCall>,
}

impl HostPlan {
    /// Assemble the call sequence from a built IR and its metadata:
    /// allocate both streams, pack every read array, run the kernel,
    /// unpack every write array, free both streams.
    pub fn new(ir: &SpdIr, meta: &KernelMeta) -> Self {
        let mut calls = Vec::new();

        calls.push(RuntimeCall::AllocStream {
            stream: Side::Read,
            size: ir.read_stream().alloc_size(),
        });
        calls.push(RuntimeCall::AllocStream {
            stream: Side::Write,
            size: ir.write_stream().alloc_size(),
        });

        for info in ir.read_arrays() {
            calls.push(RuntimeCall::Pack {
                array: info.name.clone(),
                offset: info.offset,
                stride: ir.read_stream().stride,
                count: info.total_len(),
            });
        }

        calls.push(RuntimeCall::RunKernel {
            kernel: ir.kernel_num(),
            read_size: ir.read_stream().alloc_size(),
            write_size: ir.write_stream().alloc_size(),
            switch_in_out: meta.switch_in_out,
        });

        for info in ir.write_arrays() {
            calls.push(RuntimeCall::Unpack {
                array: info.name.clone(),
                offset: info.offset,
                stride: ir.write_stream().stride,
                count: info.total_len(),
            });
        }

        calls.push(RuntimeCall::FreeStream { stream: Side::Read });
        calls.push(RuntimeCall::FreeStream { stream: Side::Write });

        HostPlan {
            kernel: ir.kernel_num(),
            calls,
        }
    }

    /// Calls in execution order.
    pub fn calls(&self) -> &[RuntimeCall] {
        &self.calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{BinOp, RegionBuilder};

    fn build_ir() -> SpdIr {
        let mut b = RegionBuilder::new("vadd2d");
        let a = b.array("A", &[4, 4]);
        let bb = b.array("B", &[4, 4]);
        let c = b.array("C", &[4, 4]);
        let mut s = b.statement(&[(0, 3), (0, 3)]);
        let la = s.load(a, &[0, 0]);
        let lb = s.load(bb, &[0, 0]);
        let sum = s.binary(BinOp::FAdd, la, lb);
        s.store(c, &[0, 0], sum);
        SpdIr::build(&s.finish().finish(), 3).unwrap()
    }

    #[test]
    fn test_plan_shape() {
        let ir = build_ir();
        let meta = KernelMeta::scalar(3);
        let plan = HostPlan::new(&ir, &meta);

        // alloc x2, pack x2, run, unpack x1, free x2
        assert_eq!(plan.calls().len(), 8);
        assert!(matches!(
            plan.calls()[0],
            RuntimeCall::AllocStream { stream: Side::Read, size: 32 }
        ));
        assert!(matches!(
            plan.calls()[1],
            RuntimeCall::AllocStream { stream: Side::Write, size: 16 }
        ));
        assert!(matches!(
            plan.calls()[4],
            RuntimeCall::RunKernel { kernel: 3, read_size: 32, write_size: 16, switch_in_out: false }
        ));
        assert!(matches!(plan.calls()[7], RuntimeCall::FreeStream { stream: Side::Write }));
    }

    #[test]
    fn test_pack_and_unpack_arguments() {
        let ir = build_ir();
        let plan = HostPlan::new(&ir, &KernelMeta::scalar(3));

        match &plan.calls()[2] {
            RuntimeCall::Pack { array, offset, stride, count } => {
                assert_eq!(array, "A");
                assert_eq!(*offset, 0);
                assert_eq!(*stride, 2);
                assert_eq!(*count, 16);
            }
            other => panic!("expected pack call, got {:?}", other),
        }
        match &plan.calls()[5] {
            RuntimeCall::Unpack { array, offset, stride, count } => {
                assert_eq!(array, "C");
                assert_eq!(*offset, 0);
                assert_eq!(*stride, 1);
                assert_eq!(*count, 16);
            }
            other => panic!("expected unpack call, got {:?}", other),
        }
    }

    #[test]
    fn test_runtime_symbols() {
        let ir = build_ir();
        let plan = HostPlan::new(&ir, &KernelMeta::scalar(3));
        let symbols: Vec<&str> = plan.calls().iter().map(RuntimeCall::symbol).collect();
        assert_eq!(
            symbols,
            vec![
                "__spd_alloc_stream",
                "__spd_alloc_stream",
                "__spd_pack_contiguous",
                "__spd_pack_contiguous",
                "__spd_run_kernel",
                "__spd_unpack_contiguous",
                "__spd_free_stream",
                "__spd_free_stream",
            ]
        );
    }

    #[test]
    fn test_plan_serializes() {
        let ir = build_ir();
        let plan = HostPlan::new(&ir, &KernelMeta::scalar(3));
        let json = serde_json::to_string(&plan).unwrap();
        let back: HostPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kernel, 3);
        assert_eq!(back.calls, plan.calls);
    }
}
