//! Error types for the SPD lowering pipeline.
//!
//! The lowering has a strict "no partial result" contract: a region either
//! fits the supported affine-kernel subset completely, or construction and
//! emission reject it with one of the typed errors below. Nothing in this
//! crate aborts the process; callers decide how to surface a failure.

use thiserror::Error;

/// Top-level error type for the SPD pipeline.
#[derive(Error, Debug)]
pub enum SpdError {
    /// Error while constructing the SPD IR from a region
    #[error("IR construction error: {0}")]
    Build(#[from] BuildError),

    /// Error while emitting SPD module text
    #[error("emission error: {0}")]
    Emit(#[from] EmitError),
}

/// Error during SPD IR construction.
///
/// Every variant is fatal for the region being lowered: there is no
/// partial IR, and the caller must not emit anything for the region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The referenced array is not a global, statically-sized,
    /// multi-dimensional array of 32-bit floats.
    #[error("unsupported array shape for '{array}': {reason}")]
    UnsupportedArrayShape {
        /// Name of the offending array
        array: String,
        /// Which shape constraint was violated
        reason: String,
    },

    /// An array subscript is not of the supported `{c,+,1}` recurrence form.
    #[error("non-affine subscript for '{array}' in dimension {dim}: {detail}")]
    NonAffineSubscript {
        /// Name of the accessed array
        array: String,
        /// Subscript position, outermost first
        dim: usize,
        /// Description of the rejected expression
        detail: String,
    },

    /// The same base array appears in both the read set and the write set.
    #[error("array '{array}' is both read and written")]
    ReadWriteConflict {
        /// Name of the aliased array
        array: String,
    },

    /// A write access declares an iteration domain that differs from the
    /// domain established by an earlier write.
    #[error("write to '{array}' disagrees with the region's iteration domain")]
    InconsistentDomain {
        /// Name of the array whose write produced the mismatch
        array: String,
    },

    /// Read-side and write-side streams sweep different numbers of
    /// element groups, so they cannot advance in lockstep.
    #[error(
        "read/write stream mismatch: alloc {read_size} vs {write_size}, \
         {num_reads} read array(s) vs {num_writes} write array(s)"
    )]
    StreamSizeMismatch {
        /// Allocation size of the read stream
        read_size: u64,
        /// Allocation size of the write stream
        write_size: u64,
        /// Number of distinct read arrays
        num_reads: usize,
        /// Number of distinct write arrays
        num_writes: usize,
    },

    /// Arrays multiplexed into one stream must share dimensionality, and
    /// subscript vectors must match the rank they index into.
    #[error("rank mismatch for '{array}': expected {expected} dimension(s), found {found}")]
    RankMismatch {
        /// Name of the offending array
        array: String,
        /// Expected dimensionality
        expected: usize,
        /// Actual dimensionality
        found: usize,
    },

    /// The region does not contain exactly one statement. This is a
    /// contract violation by the upstream extraction pass, not an
    /// unsupported-input condition.
    #[error("region must contain exactly one statement, found {found}")]
    MultipleStatements {
        /// Number of statements in the region
        found: usize,
    },

    /// The region has no memory accesses on one side; an SPD kernel must
    /// stream at least one array in and one array out.
    #[error("region has no {side} accesses")]
    MissingAccess {
        /// Which access side is empty ("read" or "write")
        side: &'static str,
    },

    /// An extraction-metadata field is not a constant integer of the
    /// expected shape.
    #[error("extraction metadata field '{field}' is not a constant integer")]
    BadMetadata {
        /// Name of the malformed field
        field: &'static str,
    },
}

/// Error during SPD module text emission.
#[derive(Error, Debug)]
pub enum EmitError {
    /// The backward search for a masked write's pass-through value did not
    /// find exactly one candidate memory read.
    #[error(
        "cannot determine mask source for write to '{array}': \
         {candidates} candidate read(s)"
    )]
    AmbiguousMaskSource {
        /// Name of the written array
        array: String,
        /// How many candidate reads the search found
        candidates: usize,
    },

    /// An instruction outside the supported opcode set reached emission.
    #[error("unsupported opcode in SPD emission: {opcode}")]
    UnsupportedOpcode {
        /// Printable name of the opcode or instruction kind
        opcode: String,
    },

    /// A constant uses a floating-point format the selected printer
    /// variant cannot reproduce bit-exactly.
    #[error("unsupported constant format: {detail}")]
    UnsupportedConstantFormat {
        /// Description of the rejected constant
        detail: String,
    },

    /// The pipeline wrapper chains kernel stages positionally, which
    /// requires the read and write port lists to have the same width.
    #[error(
        "cannot chain pipeline stages: {num_reads} read array(s) \
         vs {num_writes} write array(s)"
    )]
    PipelineArityMismatch {
        /// Number of read-side arrays
        num_reads: usize,
        /// Number of write-side arrays
        num_writes: usize,
    },
}

/// Result type using [`SpdError`].
pub type SpdResult<T> = Result<T, SpdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let err = BuildError::StreamSizeMismatch {
            read_size: 32,
            write_size: 16,
            num_reads: 2,
            num_writes: 1,
        };
        let s = format!("{}", err);
        assert!(s.contains("32"));
        assert!(s.contains("16"));
    }

    #[test]
    fn test_error_conversion() {
        let err: SpdError = BuildError::MultipleStatements { found: 2 }.into();
        assert!(matches!(err, SpdError::Build(_)));
    }
}
