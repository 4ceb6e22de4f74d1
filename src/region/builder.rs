//! Fluent builders for region construction.
//!
//! Upstream passes (and this crate's tests) assemble [`Region`] values
//! through these builders rather than filling the structs by hand, which
//! keeps instruction ids and the array table consistent.

use super::{
    Access, ArrayDecl, ArrayId, BinOp, DimBound, ElemKind, InstrId, InstrKind, Instruction,
    Operand, Region, Statement, SubscriptExpr,
};

/// Builder for a [`Region`].
#[derive(Debug)]
pub struct RegionBuilder {
    name: String,
    arrays: Vec<ArrayDecl>,
    statements: Vec<Statement>,
    next_instr: usize,
}

impl RegionBuilder {
    /// Start a new region with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arrays: Vec::new(),
            statements: Vec::new(),
            next_instr: 0,
        }
    }

    /// Declare a global f32 array and return its handle.
    pub fn array(&mut self, name: impl Into<String>, dim_sizes: &[u64]) -> ArrayId {
        self.array_with(name, dim_sizes, ElemKind::F32, true)
    }

    /// Declare an array with explicit element kind and storage class.
    pub fn array_with(
        &mut self,
        name: impl Into<String>,
        dim_sizes: &[u64],
        elem: ElemKind,
        is_global: bool,
    ) -> ArrayId {
        let id = ArrayId(self.arrays.len());
        self.arrays.push(ArrayDecl {
            name: name.into(),
            dim_sizes: dim_sizes.to_vec(),
            elem,
            is_global,
        });
        id
    }

    /// Open a statement with the given inclusive per-dimension bounds,
    /// outermost first.
    pub fn statement(self, bounds: &[(i64, i64)]) -> StatementBuilder {
        StatementBuilder {
            region: self,
            bounds: bounds
                .iter()
                .map(|&(min, max)| DimBound { min, max })
                .collect(),
            instrs: Vec::new(),
        }
    }

    /// Finish the region.
    pub fn finish(self) -> Region {
        Region {
            name: self.name,
            arrays: self.arrays,
            statements: self.statements,
        }
    }

    fn fresh_id(&mut self) -> InstrId {
        let id = InstrId(self.next_instr);
        self.next_instr += 1;
        id
    }
}

/// Builder for one [`Statement`] inside a region.
#[derive(Debug)]
pub struct StatementBuilder {
    region: RegionBuilder,
    bounds: Vec<DimBound>,
    instrs: Vec<Instruction>,
}

impl StatementBuilder {
    /// Append a load with unit-step subscripts starting at `starts`
    /// (outermost first). Returns the load's value as an operand.
    pub fn load(&mut self, array: ArrayId, starts: &[i64]) -> Operand {
        let subscripts = starts
            .iter()
            .map(|&s| SubscriptExpr::AddRec { start: s, step: 1 })
            .collect();
        self.load_subscripts(array, subscripts)
    }

    /// Append a load with explicit subscript expressions.
    pub fn load_subscripts(&mut self, array: ArrayId, subscripts: Vec<SubscriptExpr>) -> Operand {
        let id = self.push(None, InstrKind::Load(Access { array, subscripts }));
        Operand::Instr(id)
    }

    /// Append a binary arithmetic instruction.
    pub fn binary(&mut self, op: BinOp, lhs: Operand, rhs: Operand) -> Operand {
        let id = self.push(None, InstrKind::Binary { op, lhs, rhs });
        Operand::Instr(id)
    }

    /// Append a store of `value` with unit-step subscripts starting at
    /// `starts` (outermost first).
    pub fn store(&mut self, array: ArrayId, starts: &[i64], value: Operand) -> InstrId {
        let subscripts = starts
            .iter()
            .map(|&s| SubscriptExpr::AddRec { start: s, step: 1 })
            .collect();
        self.store_subscripts(array, subscripts, value)
    }

    /// Append a store with explicit subscript expressions.
    pub fn store_subscripts(
        &mut self,
        array: ArrayId,
        subscripts: Vec<SubscriptExpr>,
        value: Operand,
    ) -> InstrId {
        self.push(
            None,
            InstrKind::Store {
                access: Access { array, subscripts },
                value,
            },
        )
    }

    /// Append an instruction outside the supported subset.
    pub fn other(&mut self, what: impl Into<String>) -> Operand {
        let id = self.push(None, InstrKind::Other(what.into()));
        Operand::Instr(id)
    }

    /// Attach a name to the most recently added instruction.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        if let Some(last) = self.instrs.last_mut() {
            last.name = Some(name.into());
        }
        self
    }

    /// Close the statement and return the region builder.
    pub fn finish(mut self) -> RegionBuilder {
        self.region.statements.push(Statement {
            instrs: self.instrs,
            bounds: self.bounds,
        });
        self.region
    }

    fn push(&mut self, name: Option<String>, kind: InstrKind) -> InstrId {
        let id = self.region.fresh_id();
        self.instrs.push(Instruction { id, name, kind });
        id
    }
}
