//! The SPD core: stream/array/domain descriptors, IR construction with
//! its validation pipeline, and module text emission.

pub mod info;
pub mod ir;
pub mod printer;

pub use info::{ArrayInfo, DomainDim, DomainInfo, StreamInfo};
pub use ir::{Side, SpdInstr, SpdIr};
pub use printer::{Printer, SpdFile, SpdOutput};
