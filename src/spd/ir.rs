//! SPD IR construction and validation.
//!
//! [`SpdIr::build`] turns one extracted region into a stream dataflow
//! graph, or rejects it with a [`BuildError`] if any structural
//! assumption of the SPD model is violated. Construction either fully
//! succeeds or produces nothing; there is no partial IR.
//!
//! All nodes live by value inside the `SpdIr` and are referenced by their
//! stable region instruction ids, so no manual lifetime tracking is
//! needed anywhere in the graph.

use crate::region::{Access, InstrKind, Instruction, InstrId, Region, Statement};
use crate::region::ArrayId;
use crate::spd::info::{ArrayInfo, DomainDim, DomainInfo, StreamInfo};
use crate::utils::errors::BuildError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Which side of the kernel an array participates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Streamed into the kernel
    Read,
    /// Streamed out of the kernel
    Write,
}

/// Location of an array's descriptor inside the IR.
#[derive(Debug, Clone, Copy)]
struct ArraySlot {
    side: Side,
    index: usize,
}

/// One node of the SPD dataflow graph: a region instruction plus its
/// computed stream offset.
#[derive(Debug, Clone)]
pub struct SpdInstr {
    /// The wrapped region instruction
    pub instr: Instruction,
    /// Flattened linear offset of the accessed element relative to the
    /// domain's declared start; 0 for writes and arithmetic
    pub stream_offset: i64,
}

impl SpdInstr {
    /// Stable identifier of the wrapped instruction.
    pub fn id(&self) -> InstrId {
        self.instr.id
    }

    /// Does this node write to memory?
    pub fn may_write(&self) -> bool {
        self.instr.may_write()
    }

    /// Does this node read from memory?
    pub fn may_read(&self) -> bool {
        self.instr.may_read()
    }

    /// The node's memory access, if it is a load or store.
    pub fn access(&self) -> Option<&Access> {
        self.instr.access()
    }
}

/// The SPD intermediate representation of one kernel region.
///
/// Owns the retained instruction list, the read/write array tables, both
/// stream descriptors, and the iteration domain. Immutable once built.
#[derive(Debug, Clone)]
pub struct SpdIr {
    kernel_num: u64,
    instrs: Vec<SpdInstr>,
    reads: Vec<ArrayInfo>,
    writes: Vec<ArrayInfo>,
    lookup: HashMap<ArrayId, ArraySlot>,
    read_stream: StreamInfo,
    write_stream: StreamInfo,
    domain: DomainInfo,
}

impl SpdIr {
    /// Build the IR for `region` under kernel number `kernel_num`.
    ///
    /// Runs the full ordered construction: access collection, stream
    /// synthesis, cross-checks, domain derivation, graph generation, and
    /// dead-code elimination.
    pub fn build(region: &Region, kernel_num: u64) -> Result<Self, BuildError> {
        let stmt = region.single_statement()?;

        let mut ir = SpdIr {
            kernel_num,
            instrs: Vec::new(),
            reads: Vec::new(),
            writes: Vec::new(),
            lookup: HashMap::new(),
            read_stream: StreamInfo {
                stride: 0,
                dim_sizes: Vec::new(),
            },
            write_stream: StreamInfo {
                stride: 0,
                dim_sizes: Vec::new(),
            },
            domain: DomainInfo { dims: Vec::new() },
        };

        ir.collect_accesses(region, stmt, Side::Read)?;
        ir.read_stream = make_stream(&ir.reads, "read")?;

        ir.collect_accesses(region, stmt, Side::Write)?;
        ir.write_stream = make_stream(&ir.writes, "write")?;

        // both streams advance in lockstep over the domain, so they must
        // sweep the same number of element groups
        if ir.read_stream.num_groups() != ir.write_stream.num_groups() {
            return Err(BuildError::StreamSizeMismatch {
                read_size: ir.read_stream.alloc_size(),
                write_size: ir.write_stream.alloc_size(),
                num_reads: ir.reads.len(),
                num_writes: ir.writes.len(),
            });
        }

        ir.domain = derive_write_domain(region, stmt)?;

        ir.generate_graph(region, stmt)?;
        ir.remove_dead_instrs();

        debug!(
            "built SPD IR for kernel {}: {} instr(s), {} read / {} write array(s), domain {}",
            ir.kernel_num,
            ir.instrs.len(),
            ir.reads.len(),
            ir.writes.len(),
            ir.domain
        );

        Ok(ir)
    }

    /// Kernel number assigned by the driver's counter.
    pub fn kernel_num(&self) -> u64 {
        self.kernel_num
    }

    /// Retained instructions, in program order.
    pub fn instrs(&self) -> &[SpdInstr] {
        &self.instrs
    }

    /// Read-side array descriptors, in offset order.
    pub fn read_arrays(&self) -> &[ArrayInfo] {
        &self.reads
    }

    /// Write-side array descriptors, in offset order.
    pub fn write_arrays(&self) -> &[ArrayInfo] {
        &self.writes
    }

    /// The read stream descriptor.
    pub fn read_stream(&self) -> &StreamInfo {
        &self.read_stream
    }

    /// The write stream descriptor.
    pub fn write_stream(&self) -> &StreamInfo {
        &self.write_stream
    }

    /// The shared iteration domain.
    pub fn domain(&self) -> &DomainInfo {
        &self.domain
    }

    /// Is the instruction with this id still in the retained list?
    pub fn has(&self, id: InstrId) -> bool {
        self.instrs.iter().any(|i| i.id() == id)
    }

    /// Find a retained instruction by id.
    pub fn find(&self, id: InstrId) -> Option<&SpdInstr> {
        self.instrs.iter().find(|i| i.id() == id)
    }

    /// Look up the descriptor of an array by its region handle.
    pub fn array_info(&self, array: ArrayId) -> Option<&ArrayInfo> {
        let slot = self.lookup.get(&array)?;
        Some(match slot.side {
            Side::Read => &self.reads[slot.index],
            Side::Write => &self.writes[slot.index],
        })
    }

    /// Which side an array participates on.
    pub fn side_of(&self, array: ArrayId) -> Option<Side> {
        self.lookup.get(&array).map(|s| s.side)
    }

    /// Register every distinct base array accessed on `side`, assigning
    /// sequential stream offsets in first-encounter order.
    fn collect_accesses(
        &mut self,
        region: &Region,
        stmt: &Statement,
        side: Side,
    ) -> Result<(), BuildError> {
        let mut offset: u32 = 0;
        for instr in &stmt.instrs {
            let access = match (&instr.kind, side) {
                (InstrKind::Load(a), Side::Read) => a,
                (InstrKind::Store { access, .. }, Side::Write) => access,
                _ => continue,
            };

            match self.lookup.get(&access.array) {
                Some(slot) if slot.side != side => {
                    return Err(BuildError::ReadWriteConflict {
                        array: region.array(access.array).name.clone(),
                    });
                }
                Some(_) => {} // already registered on this side
                None => {
                    let info = ArrayInfo::new(access.array, region.array(access.array), offset)?;
                    let list = match side {
                        Side::Read => &mut self.reads,
                        Side::Write => &mut self.writes,
                    };
                    self.lookup.insert(
                        access.array,
                        ArraySlot {
                            side,
                            index: list.len(),
                        },
                    );
                    list.push(info);
                    offset += 1;
                }
            }
        }
        Ok(())
    }

    /// Walk the statement in program order, wrapping every representable
    /// instruction into an [`SpdInstr`].
    fn generate_graph(&mut self, region: &Region, stmt: &Statement) -> Result<(), BuildError> {
        for instr in &stmt.instrs {
            let stream_offset = match &instr.kind {
                InstrKind::Store { .. } => 0,
                InstrKind::Load(access) => self.load_offset(region, access)?,
                InstrKind::Binary { .. } => 0,
                InstrKind::Other(_) => continue,
            };
            self.instrs.push(SpdInstr {
                instr: instr.clone(),
                stream_offset,
            });
        }
        Ok(())
    }

    /// Flattened stream offset of a read, anchored at the domain start:
    /// `sum_i (subscriptStart[i] - domainStart[i]) * accumulator[i]` with
    /// row-major accumulators over the array's own dimension sizes.
    fn load_offset(&self, region: &Region, access: &Access) -> Result<i64, BuildError> {
        let name = &region.array(access.array).name;
        let info = self
            .array_info(access.array)
            .expect("read arrays are registered before graph generation");

        if access.subscripts.len() != info.num_dims() {
            return Err(BuildError::RankMismatch {
                array: name.clone(),
                expected: info.num_dims(),
                found: access.subscripts.len(),
            });
        }
        if access.subscripts.len() != self.domain.num_dims() {
            return Err(BuildError::RankMismatch {
                array: name.clone(),
                expected: self.domain.num_dims(),
                found: access.subscripts.len(),
            });
        }

        let acc = info.accumulators();
        let mut offset = 0i64;
        for (i, sub) in access.subscripts.iter().enumerate() {
            let start = sub
                .affine_unit_start()
                .ok_or_else(|| BuildError::NonAffineSubscript {
                    array: name.clone(),
                    dim: i,
                    detail: sub.describe(),
                })?;
            offset += (start - self.domain.start(i)) * acc[i];
        }
        Ok(offset)
    }

    /// Fixpoint dead-code elimination: drop every node that neither
    /// writes to memory nor is used by a node still in the list, until a
    /// full pass removes nothing. The liveness check is a membership test
    /// over the current id set, recomputed each pass.
    fn remove_dead_instrs(&mut self) {
        loop {
            let live: HashSet<InstrId> = self.instrs.iter().map(SpdInstr::id).collect();
            let mut used: HashSet<InstrId> = HashSet::new();
            for node in &self.instrs {
                for op in node.instr.instr_operands() {
                    if live.contains(&op) {
                        used.insert(op);
                    }
                }
            }

            let before = self.instrs.len();
            self.instrs
                .retain(|node| node.may_write() || used.contains(&node.id()));
            if self.instrs.len() == before {
                break;
            }
        }
    }
}

/// Synthesize the stream descriptor for one side: all participants must
/// share dimensionality; the stream dimensions are the componentwise
/// maximum and the stride is the participant count.
fn make_stream(arrays: &[ArrayInfo], side: &'static str) -> Result<StreamInfo, BuildError> {
    let first = arrays
        .first()
        .ok_or(BuildError::MissingAccess { side })?;

    let num_dims = first.num_dims();
    let mut dim_sizes = vec![0u64; num_dims];
    for info in arrays {
        if info.num_dims() != num_dims {
            return Err(BuildError::RankMismatch {
                array: info.name.clone(),
                expected: num_dims,
                found: info.num_dims(),
            });
        }
        for (slot, &d) in dim_sizes.iter_mut().zip(&info.dim_sizes) {
            if d > *slot {
                *slot = d;
            }
        }
    }

    Ok(StreamInfo {
        stride: arrays.len() as u32,
        dim_sizes,
    })
}

/// Derive the shared iteration domain from the write accesses: per
/// dimension, start = the write subscript's constant start and
/// end = start + tripCount - 1. Every write must produce an identical
/// domain.
fn derive_write_domain(region: &Region, stmt: &Statement) -> Result<DomainInfo, BuildError> {
    let trips = stmt.trip_counts();
    let mut domain: Option<DomainInfo> = None;

    for instr in &stmt.instrs {
        let access = match &instr.kind {
            InstrKind::Store { access, .. } => access,
            _ => continue,
        };
        let name = &region.array(access.array).name;

        if access.subscripts.len() != trips.len() {
            return Err(BuildError::RankMismatch {
                array: name.clone(),
                expected: trips.len(),
                found: access.subscripts.len(),
            });
        }

        let mut dims = Vec::with_capacity(trips.len());
        for (i, sub) in access.subscripts.iter().enumerate() {
            let start = sub
                .affine_unit_start()
                .ok_or_else(|| BuildError::NonAffineSubscript {
                    array: name.clone(),
                    dim: i,
                    detail: sub.describe(),
                })?;
            dims.push(DomainDim {
                start,
                end: start + trips[i] - 1,
                stride: 1,
            });
        }

        let current = DomainInfo { dims };
        match &domain {
            None => domain = Some(current),
            Some(canonical) => {
                if *canonical != current {
                    return Err(BuildError::InconsistentDomain {
                        array: name.clone(),
                    });
                }
            }
        }
    }

    // make_stream already guarantees at least one write access
    domain.ok_or(BuildError::MissingAccess { side: "write" })
}
