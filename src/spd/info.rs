//! Array, stream, and domain descriptors of the SPD model.
//!
//! These are the plain-data facts the host-code-generation pass reads
//! back after lowering: which arrays participate on each side, how they
//! are multiplexed into a linear stream, and which iteration rectangle
//! the kernel sweeps.

use crate::region::{ArrayDecl, ArrayId, ElemKind};
use crate::utils::errors::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptor of one base array participating in a kernel.
///
/// The SPD model only admits global, statically-sized arrays of 32-bit
/// floats; [`ArrayInfo::new`] rejects everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayInfo {
    /// Handle of the underlying array in the region's table
    pub array: ArrayId,
    /// Array name, for diagnostics and emitted port names
    pub name: String,
    /// Dimension sizes, outermost first
    pub dim_sizes: Vec<u64>,
    /// Slot of this array within its stream's element group
    pub offset: u32,
}

impl ArrayInfo {
    /// Validate `decl` against the SPD shape constraints and build the
    /// descriptor for stream slot `offset`.
    pub fn new(array: ArrayId, decl: &ArrayDecl, offset: u32) -> Result<Self, BuildError> {
        let reject = |reason: &str| BuildError::UnsupportedArrayShape {
            array: decl.name.clone(),
            reason: reason.to_string(),
        };

        if !decl.is_global {
            return Err(reject("array must have global storage"));
        }
        if decl.dim_sizes.is_empty() {
            return Err(reject("array must be statically sized with at least one dimension"));
        }
        if decl.dim_sizes.iter().any(|&d| d == 0) {
            return Err(reject("array dimensions must be non-zero"));
        }
        if decl.elem != ElemKind::F32 {
            return Err(reject("element type must be f32"));
        }

        Ok(Self {
            array,
            name: decl.name.clone(),
            dim_sizes: decl.dim_sizes.clone(),
            offset,
        })
    }

    /// Number of dimensions.
    pub fn num_dims(&self) -> usize {
        self.dim_sizes.len()
    }

    /// Total element count.
    pub fn total_len(&self) -> u64 {
        self.dim_sizes.iter().product()
    }

    /// Row-major accumulators, outermost first: `acc[n-1] = 1` and
    /// `acc[i] = acc[i+1] * dim_sizes[i+1]`, so the outermost dimension
    /// carries the largest accumulator.
    pub fn accumulators(&self) -> Vec<i64> {
        let n = self.dim_sizes.len();
        let mut acc = vec![1i64; n];
        for i in (0..n.saturating_sub(1)).rev() {
            acc[i] = acc[i + 1] * self.dim_sizes[i + 1] as i64;
        }
        acc
    }
}

impl fmt::Display for ArrayInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for d in &self.dim_sizes {
            write!(f, "[{}]", d)?;
        }
        write!(f, " @{}", self.offset)
    }
}

/// Descriptor of the linear buffer multiplexing N arrays into one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Number of participating arrays (lanes per element group)
    pub stride: u32,
    /// Componentwise maximum of the participants' dimension sizes,
    /// outermost first
    pub dim_sizes: Vec<u64>,
}

impl StreamInfo {
    /// Total allocation size in elements: `stride * product(dim_sizes)`.
    pub fn alloc_size(&self) -> u64 {
        self.stride as u64 * self.dim_sizes.iter().product::<u64>()
    }

    /// Number of element groups the stream sweeps, one group per
    /// iteration-domain point: `product(dim_sizes)`.
    pub fn num_groups(&self) -> u64 {
        self.dim_sizes.iter().product()
    }

    /// Number of dimensions.
    pub fn num_dims(&self) -> usize {
        self.dim_sizes.len()
    }
}

/// Bounds of one dimension of the iteration domain, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDim {
    /// First iteration value
    pub start: i64,
    /// Last iteration value
    pub end: i64,
    /// Iteration stride (always 1 in the supported subset)
    pub stride: i64,
}

/// The shared rectangular iteration domain all writes of a region agree
/// on, outermost dimension first. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// Per-dimension bounds
    pub dims: Vec<DomainDim>,
}

impl DomainInfo {
    /// Number of dimensions.
    pub fn num_dims(&self) -> usize {
        self.dims.len()
    }

    /// Declared start of dimension `i`.
    pub fn start(&self, i: usize) -> i64 {
        self.dims[i].start
    }
}

impl fmt::Display for DomainInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ ")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, " x ")?;
            }
            write!(f, "[{}:{}:{}]", d.start, d.end, d.stride)?;
        }
        write!(f, " }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{ArrayDecl, ArrayId, ElemKind};

    fn decl(name: &str, dims: &[u64], elem: ElemKind, is_global: bool) -> ArrayDecl {
        ArrayDecl {
            name: name.to_string(),
            dim_sizes: dims.to_vec(),
            elem,
            is_global,
        }
    }

    #[test]
    fn test_array_info_accepts_global_f32() {
        let d = decl("a", &[4, 8], ElemKind::F32, true);
        let info = ArrayInfo::new(ArrayId(0), &d, 2).unwrap();
        assert_eq!(info.num_dims(), 2);
        assert_eq!(info.total_len(), 32);
        assert_eq!(info.offset, 2);
    }

    #[test]
    fn test_array_info_rejects_bad_shapes() {
        let d = decl("a", &[4], ElemKind::F64, true);
        assert!(matches!(
            ArrayInfo::new(ArrayId(0), &d, 0),
            Err(BuildError::UnsupportedArrayShape { .. })
        ));

        let d = decl("a", &[4], ElemKind::F32, false);
        assert!(ArrayInfo::new(ArrayId(0), &d, 0).is_err());

        let d = decl("a", &[], ElemKind::F32, true);
        assert!(ArrayInfo::new(ArrayId(0), &d, 0).is_err());
    }

    #[test]
    fn test_accumulators_outermost_major() {
        let d = decl("a", &[2, 3, 4], ElemKind::F32, true);
        let info = ArrayInfo::new(ArrayId(0), &d, 0).unwrap();
        // innermost accumulator is 1, outermost is 3*4
        assert_eq!(info.accumulators(), vec![12, 4, 1]);

        let d = decl("b", &[5], ElemKind::F32, true);
        let info = ArrayInfo::new(ArrayId(1), &d, 0).unwrap();
        assert_eq!(info.accumulators(), vec![1]);
    }

    #[test]
    fn test_stream_alloc_size() {
        let s = StreamInfo {
            stride: 2,
            dim_sizes: vec![4, 4],
        };
        assert_eq!(s.alloc_size(), 32);

        let s = StreamInfo {
            stride: 1,
            dim_sizes: vec![4, 4],
        };
        assert_eq!(s.alloc_size(), 16);
    }

    #[test]
    fn test_domain_equality() {
        let d1 = DomainInfo {
            dims: vec![DomainDim { start: 0, end: 3, stride: 1 }],
        };
        let d2 = DomainInfo {
            dims: vec![DomainDim { start: 0, end: 3, stride: 1 }],
        };
        let d3 = DomainInfo {
            dims: vec![DomainDim { start: 1, end: 4, stride: 1 }],
        };
        assert_eq!(d1, d2);
        assert_ne!(d1, d3);
    }
}
