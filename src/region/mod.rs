//! Input-side model of an extracted loop region.
//!
//! The SPD lowering does not run its own polyhedral analysis. An upstream
//! pass detects an affine loop nest, extracts it into a standalone kernel
//! region, and hands this crate the narrow surface modeled here: the
//! region's statements, their per-dimension iteration bounds, the memory
//! accesses with their subscript recurrences, and the extraction metadata
//! record. Everything in this module is plain data; the core trusts it as
//! given and validates only the invariants of the SPD model itself.

mod builder;

pub use builder::{RegionBuilder, StatementBuilder};

use crate::utils::errors::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unique identifier for an array within a region's array table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayId(pub usize);

impl fmt::Display for ArrayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// A unique identifier for an instruction within a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstrId(pub usize);

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Element kind of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElemKind {
    /// 32-bit float; the only kind the SPD model accepts
    F32,
    /// 64-bit float
    F64,
    /// 32-bit integer
    I32,
    /// 64-bit integer
    I64,
}

impl fmt::Display for ElemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ElemKind::F32 => "f32",
            ElemKind::F64 => "f64",
            ElemKind::I32 => "i32",
            ElemKind::I64 => "i64",
        };
        write!(f, "{}", s)
    }
}

/// Declaration of one statically-sized array object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayDecl {
    /// Array name
    pub name: String,
    /// Dimension sizes, outermost first
    pub dim_sizes: Vec<u64>,
    /// Element kind
    pub elem: ElemKind,
    /// Whether the array has global (module-level) storage
    pub is_global: bool,
}

/// An array subscript expression for one dimension.
///
/// The only supported form is the add-recurrence `{start,+,step}` with a
/// constant start; anything else is carried as `Opaque` so construction
/// can report what it rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubscriptExpr {
    /// `{start,+,step}` over the governing loop
    AddRec {
        /// Constant start value
        start: i64,
        /// Per-iteration step
        step: i64,
    },
    /// A non-affine or otherwise unsupported expression
    Opaque(String),
}

impl SubscriptExpr {
    /// The scalar-evolution query the core relies on: is this subscript
    /// affine with a constant start and a step recurrence of exactly 1?
    /// Returns the constant start when it is.
    pub fn affine_unit_start(&self) -> Option<i64> {
        match self {
            SubscriptExpr::AddRec { start, step: 1 } => Some(*start),
            _ => None,
        }
    }

    /// Describe the expression for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            SubscriptExpr::AddRec { start, step } => format!("{{{},+,{}}}", start, step),
            SubscriptExpr::Opaque(s) => s.clone(),
        }
    }
}

/// One memory access: a base array and per-dimension subscripts,
/// outermost first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Access {
    /// Base array handle
    pub array: ArrayId,
    /// Per-dimension subscript expressions, outermost first
    pub subscripts: Vec<SubscriptExpr>,
}

/// A bit-exact carrier for a floating-point constant.
///
/// Every variant preserves the original bit pattern; the printer decides
/// which ones it can reproduce in the output text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FloatConst {
    /// IEEE half precision, raw bits
    Half(u16),
    /// IEEE single precision
    Single(f32),
    /// IEEE double precision
    Double(f64),
    /// x87 80-bit extended: 16 high bits, 64 low bits
    X87 {
        /// High 16 bits (sign + exponent)
        hi: u16,
        /// Low 64 bits (significand)
        lo: u64,
    },
    /// IEEE quad precision: high and low 64-bit halves
    Quad {
        /// High 64 bits
        hi: u64,
        /// Low 64 bits
        lo: u64,
    },
}

/// An instruction operand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    /// Result of another instruction in the same statement
    Instr(InstrId),
    /// Integer constant; `bits == 1` marks a boolean
    ConstInt {
        /// Constant value
        value: i64,
        /// Bit width of the integer type
        bits: u32,
    },
    /// Floating-point constant
    ConstFloat(FloatConst),
}

impl Operand {
    /// The instruction this operand refers to, if any.
    pub fn as_instr(&self) -> Option<InstrId> {
        match self {
            Operand::Instr(id) => Some(*id),
            _ => None,
        }
    }
}

/// Binary opcodes representable in the SPD dataflow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    /// Integer addition
    Add,
    /// Floating-point addition
    FAdd,
    /// Integer subtraction
    Sub,
    /// Floating-point subtraction
    FSub,
    /// Integer multiplication
    Mul,
    /// Floating-point multiplication
    FMul,
    /// Unsigned integer division
    UDiv,
    /// Signed integer division
    SDiv,
    /// Floating-point division
    FDiv,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "add",
            BinOp::FAdd => "fadd",
            BinOp::Sub => "sub",
            BinOp::FSub => "fsub",
            BinOp::Mul => "mul",
            BinOp::FMul => "fmul",
            BinOp::UDiv => "udiv",
            BinOp::SDiv => "sdiv",
            BinOp::FDiv => "fdiv",
        };
        write!(f, "{}", s)
    }
}

/// The kind of a region instruction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InstrKind {
    /// Memory read through an affine access
    Load(Access),
    /// Memory write of `value` through an affine access
    Store {
        /// The written access
        access: Access,
        /// The stored value
        value: Operand,
    },
    /// Binary arithmetic
    Binary {
        /// Opcode
        op: BinOp,
        /// Left operand
        lhs: Operand,
        /// Right operand
        rhs: Operand,
    },
    /// Any instruction outside the supported subset; never represented
    /// in the SPD graph
    Other(String),
}

/// One instruction inside a region statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// Stable identifier within the region
    pub id: InstrId,
    /// Source-level name, if the value had one
    pub name: Option<String>,
    /// Instruction payload
    pub kind: InstrKind,
}

impl Instruction {
    /// Does this instruction read from memory?
    pub fn may_read(&self) -> bool {
        matches!(self.kind, InstrKind::Load(_))
    }

    /// Does this instruction write to memory?
    pub fn may_write(&self) -> bool {
        matches!(self.kind, InstrKind::Store { .. })
    }

    /// The memory access of a load or store.
    pub fn access(&self) -> Option<&Access> {
        match &self.kind {
            InstrKind::Load(a) => Some(a),
            InstrKind::Store { access, .. } => Some(access),
            _ => None,
        }
    }

    /// Operands referring to other instructions.
    pub fn instr_operands(&self) -> Vec<InstrId> {
        let mut out = Vec::new();
        match &self.kind {
            InstrKind::Store { value, .. } => {
                if let Some(id) = value.as_instr() {
                    out.push(id);
                }
            }
            InstrKind::Binary { lhs, rhs, .. } => {
                if let Some(id) = lhs.as_instr() {
                    out.push(id);
                }
                if let Some(id) = rhs.as_instr() {
                    out.push(id);
                }
            }
            InstrKind::Load(_) | InstrKind::Other(_) => {}
        }
        out
    }
}

/// Inclusive per-dimension iteration bounds of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimBound {
    /// Smallest iteration value
    pub min: i64,
    /// Largest iteration value
    pub max: i64,
}

impl DimBound {
    /// Number of iterations in this dimension.
    pub fn trip_count(&self) -> i64 {
        self.max - self.min + 1
    }
}

/// One statement of a region: an ordered instruction sequence plus the
/// iteration-domain bounds it executes under, outermost first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Instructions in program order
    pub instrs: Vec<Instruction>,
    /// Per-dimension iteration bounds, outermost first
    pub bounds: Vec<DimBound>,
}

impl Statement {
    /// Per-dimension loop trip counts, outermost first.
    pub fn trip_counts(&self) -> Vec<i64> {
        self.bounds.iter().map(DimBound::trip_count).collect()
    }

    /// Look up an instruction by id.
    pub fn instr(&self, id: InstrId) -> Option<&Instruction> {
        self.instrs.iter().find(|i| i.id == id)
    }
}

/// An extracted affine loop region selected for SPD lowering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Region name (for diagnostics and dumps)
    pub name: String,
    /// Array table; `ArrayId` indexes into this
    pub arrays: Vec<ArrayDecl>,
    /// Statements in the region
    pub statements: Vec<Statement>,
}

impl Region {
    /// Look up an array declaration.
    pub fn array(&self, id: ArrayId) -> &ArrayDecl {
        &self.arrays[id.0]
    }

    /// The region's single statement, or `MultipleStatements` if the
    /// upstream contract was violated.
    pub fn single_statement(&self) -> Result<&Statement, BuildError> {
        if self.statements.len() != 1 {
            return Err(BuildError::MultipleStatements {
                found: self.statements.len(),
            });
        }
        Ok(&self.statements[0])
    }
}

/// Metadata attached to an extracted kernel function by the loop
/// extraction pass: region id, vectorization/unroll factors, and the
/// in/out buffer swap flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelMeta {
    /// Region identifier
    pub region_number: u64,
    /// Vector length (number of lanes), >= 1
    pub vector_length: u64,
    /// Pipeline unroll count, >= 1
    pub unroll_count: u64,
    /// Swap input/output stream buffers between runs
    pub switch_in_out: bool,
}

impl KernelMeta {
    /// Metadata for a plain scalar kernel.
    pub fn scalar(region_number: u64) -> Self {
        Self {
            region_number,
            vector_length: 1,
            unroll_count: 1,
            switch_in_out: false,
        }
    }

    /// Decode a metadata record from raw marker-call operands, in the
    /// order (region number, vector length, unroll count, switch flag).
    /// Each field must be a constant integer; the switch flag must be
    /// 0 or 1.
    pub fn from_operands(ops: &[Operand]) -> Result<Self, BuildError> {
        fn const_int(op: Option<&Operand>, field: &'static str) -> Result<i64, BuildError> {
            match op {
                Some(Operand::ConstInt { value, .. }) => Ok(*value),
                _ => Err(BuildError::BadMetadata { field }),
            }
        }

        let region_number = const_int(ops.first(), "region number")? as u64;
        let vector_length = const_int(ops.get(1), "vector length")? as u64;
        let unroll_count = const_int(ops.get(2), "unroll count")? as u64;
        let switch_raw = const_int(ops.get(3), "switch in/out")?;
        if switch_raw != 0 && switch_raw != 1 {
            return Err(BuildError::BadMetadata {
                field: "switch in/out",
            });
        }

        Ok(Self {
            region_number,
            vector_length,
            unroll_count,
            switch_in_out: switch_raw == 1,
        })
    }
}
