//! SPD module text emission.
//!
//! The emitted format is a line-oriented declarative module language
//! consumed by downstream spatial-synthesis tooling, so spacing, port
//! ordering, and constant formatting are all part of the contract. Three
//! variants exist: scalar (vector length 1), vectorized (lane-suffixed
//! symbols, widened port lists), and unrolled (a second wrapper module
//! chaining the kernel into a pipeline).

use crate::region::{BinOp, FloatConst, InstrId, InstrKind, KernelMeta, Operand};
use crate::spd::info::ArrayInfo;
use crate::spd::ir::{SpdInstr, SpdIr};
use crate::utils::errors::EmitError;
use crate::utils::pretty::CodeFormatter;
use log::error;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One emitted module file.
#[derive(Debug, Clone)]
pub struct SpdFile {
    /// File name, e.g. `kernel3.spd`
    pub filename: String,
    /// Full file contents
    pub contents: String,
}

/// The result of one emission call.
#[derive(Debug, Clone)]
pub struct SpdOutput {
    /// The kernel module
    pub kernel: SpdFile,
    /// The pipeline wrapper module, present when unroll count > 1
    pub wrapper: Option<SpdFile>,
    /// Number of EQU statements in the kernel module; this is the
    /// per-stage latency the wrapper declares
    pub latency: usize,
}

/// Serializes a built [`SpdIr`] into SPD module text.
///
/// Borrows the IR for the duration of one emission and holds no state
/// across calls.
pub struct Printer<'a> {
    ir: &'a SpdIr,
}

impl<'a> Printer<'a> {
    /// Create a printer over a built IR.
    pub fn new(ir: &'a SpdIr) -> Self {
        Self { ir }
    }

    /// Emit the module text for the variants `meta` selects.
    pub fn emit(&self, meta: &KernelMeta) -> Result<SpdOutput, EmitError> {
        let vl = meta.vector_length.max(1);
        let uc = meta.unroll_count.max(1);
        let allow_extended = vl > 1 || uc > 1;

        let mut emitter = ModuleEmitter::new(self.ir, vl, allow_extended);
        let contents = emitter.emit_kernel()?;
        let latency = emitter.equ_count;

        let kernel = SpdFile {
            filename: format!("kernel{}.spd", self.ir.kernel_num()),
            contents,
        };
        let wrapper = if uc > 1 {
            Some(self.emit_wrapper(vl, uc, latency)?)
        } else {
            None
        };

        Ok(SpdOutput {
            kernel,
            wrapper,
            latency,
        })
    }

    /// Emit and write the module file(s) under `dir`. A file that cannot
    /// be written is reported and skipped; emission itself is not
    /// affected.
    pub fn emit_to(&self, meta: &KernelMeta, dir: &Path) -> Result<SpdOutput, EmitError> {
        let out = self.emit(meta)?;
        write_file(dir, &out.kernel);
        if let Some(wrapper) = &out.wrapper {
            write_file(dir, wrapper);
        }
        Ok(out)
    }

    /// Emit the `UC<c>_kernel<N>` wrapper chaining `uc` kernel stages.
    ///
    /// Stages are wired positionally, so the kernel's output arity must
    /// equal its input arity: same number of read and write arrays, with
    /// the three control signals appended on both sides.
    fn emit_wrapper(&self, vl: u64, uc: u64, latency: usize) -> Result<SpdFile, EmitError> {
        let ir = self.ir;
        if ir.read_arrays().len() != ir.write_arrays().len() {
            return Err(EmitError::PipelineArityMismatch {
                num_reads: ir.read_arrays().len(),
                num_writes: ir.write_arrays().len(),
            });
        }

        let kernel = format!("kernel{}", ir.kernel_num());
        let name = format!("UC{}_{}", uc, kernel);
        let in_ports = data_ports(ir.read_arrays(), "in", vl);
        let out_ports = data_ports(ir.write_arrays(), "out", vl);
        let width = out_ports.len() + 3;

        let mut f = CodeFormatter::new();
        f.writeln(&format!("// Module {}", name));
        f.writeln(&format!("{}{};", kw("Name"), name));
        f.writeln(&format!(
            "{}{{Mi::{}, sop, eop, iattr}};",
            kw("Main_In"),
            in_ports.join(", ")
        ));
        f.writeln(&format!(
            "{}{{Mo::{}, sop, eop, oattr}};",
            kw("Main_Out"),
            out_ports.join(", ")
        ));
        f.newline();
        f.writeln("// equation");

        for stage in 0..uc {
            let ins = if stage == 0 {
                let mut v = in_ports.clone();
                v.extend(["sop".to_string(), "eop".to_string(), "iattr".to_string()]);
                v
            } else {
                seam_wires(stage - 1, width)
            };
            let outs = if stage == uc - 1 {
                let mut v = out_ports.clone();
                v.extend(["sop".to_string(), "eop".to_string(), "oattr".to_string()]);
                v
            } else {
                seam_wires(stage, width)
            };
            f.writeln(&format!(
                "{}core{}, {}, ({}) = {}({});",
                kw("HDL"),
                stage,
                latency,
                outs.join(", "),
                kernel,
                ins.join(", ")
            ));
        }

        Ok(SpdFile {
            filename: format!("{}.spd", name),
            contents: f.finish(),
        })
    }
}

fn write_file(dir: &Path, file: &SpdFile) {
    let path = dir.join(&file.filename);
    if let Err(e) = std::fs::write(&path, &file.contents) {
        error!("cannot create output file {}: {}", path.display(), e);
    }
}

/// Pad a statement keyword to the 10-character keyword column.
fn kw(keyword: &str) -> String {
    format!("{:<10}", keyword)
}

/// Lane-suffixed data port names, array-major: all lanes of the first
/// array, then all lanes of the second, and so on.
fn data_ports(arrays: &[ArrayInfo], dir: &str, vl: u64) -> Vec<String> {
    let mut ports = Vec::with_capacity(arrays.len() * vl as usize);
    for info in arrays {
        for lane in 0..vl {
            ports.push(format!("{}_{}{}", info.name, dir, lane));
        }
    }
    ports
}

/// Synthetic wire names for the seam after pipeline stage `stage`.
fn seam_wires(stage: u64, width: usize) -> Vec<String> {
    (0..width).map(|j| format!("u{}_{}", stage, j)).collect()
}

fn op_token(op: BinOp) -> &'static str {
    match op {
        BinOp::Add | BinOp::FAdd => "+",
        BinOp::Sub | BinOp::FSub => "-",
        BinOp::Mul | BinOp::FMul => "*",
        BinOp::UDiv | BinOp::SDiv | BinOp::FDiv => "/",
    }
}

/// Format an integer constant: width-1 integers are booleans.
fn format_int(value: i64, bits: u32) -> String {
    if bits == 1 {
        if value != 0 { "true" } else { "false" }.to_string()
    } else {
        value.to_string()
    }
}

/// Format a floating-point constant under the printer's fidelity rules.
///
/// Finite single precision prints the shortest decimal that round-trips
/// through double precision. With `allow_extended`, double precision
/// prints the same way, non-finite values print the raw double bits as
/// uppercase hex, and the x87/quad/half formats print their bit-exact
/// prefixed hex encodings. Without it, anything beyond finite single
/// precision is rejected.
fn format_float(c: &FloatConst, allow_extended: bool) -> Result<String, EmitError> {
    let reject = |detail: String| EmitError::UnsupportedConstantFormat { detail };
    let hex64 = |bits: u64| format!("0x{:X}", bits);

    match *c {
        FloatConst::Single(v) => {
            if v.is_finite() {
                Ok(format!("{}", v as f64))
            } else if allow_extended {
                Ok(hex64((v as f64).to_bits()))
            } else {
                Err(reject(format!("non-finite single precision value {}", v)))
            }
        }
        FloatConst::Double(v) if allow_extended => {
            if v.is_finite() {
                Ok(format!("{}", v))
            } else {
                Ok(hex64(v.to_bits()))
            }
        }
        // x87: 16 high bits then the 64-bit significand
        FloatConst::X87 { hi, lo } if allow_extended => Ok(format!("0xK{:04X}{:016X}", hi, lo)),
        // quad prints the low half first
        FloatConst::Quad { hi, lo } if allow_extended => Ok(format!("0xL{:016X}{:016X}", lo, hi)),
        FloatConst::Half(bits) if allow_extended => Ok(format!("0xH{:04X}", bits)),
        FloatConst::Double(v) => Err(reject(format!("double precision value {}", v))),
        FloatConst::X87 { .. } => Err(reject("x87 extended precision".to_string())),
        FloatConst::Quad { .. } => Err(reject("quad precision".to_string())),
        FloatConst::Half(_) => Err(reject("half precision".to_string())),
    }
}

/// Emission state for one kernel module: the value numbering map, the
/// memoized mask-source search, and the EQU counter shared across lanes.
struct ModuleEmitter<'a> {
    ir: &'a SpdIr,
    vl: u64,
    allow_extended: bool,
    value_nums: HashMap<InstrId, usize>,
    next_value: usize,
    mask_cache: HashMap<InstrId, InstrId>,
    equ_count: usize,
}

impl<'a> ModuleEmitter<'a> {
    fn new(ir: &'a SpdIr, vl: u64, allow_extended: bool) -> Self {
        Self {
            ir,
            vl,
            allow_extended,
            value_nums: HashMap::new(),
            next_value: 0,
            mask_cache: HashMap::new(),
            equ_count: 0,
        }
    }

    fn emit_kernel(&mut self) -> Result<String, EmitError> {
        let ir = self.ir;
        let name = format!("kernel{}", ir.kernel_num());
        let in_ports = data_ports(ir.read_arrays(), "in", self.vl);
        let out_ports = data_ports(ir.write_arrays(), "out", self.vl);

        let mut f = CodeFormatter::new();
        f.writeln(&format!("// Module {}", name));
        f.writeln(&format!("{}{};", kw("Name"), name));
        f.writeln(&format!(
            "{}{{Mi::{}, sop, eop, attr}};",
            kw("Main_In"),
            in_ports.join(", ")
        ));
        f.writeln(&format!(
            "{}{{Mo::{}, sop, eop, attr}};",
            kw("Main_Out"),
            out_ports.join(", ")
        ));
        f.newline();
        f.writeln("// equation");

        for lane in 0..self.vl {
            for node in ir.instrs() {
                self.emit_node(&mut f, node, lane)?;
            }
        }

        f.newline();
        f.writeln("// direct connection");
        f.writeln(&format!(
            "{}(Mo::sop, Mo::eop, Mo::attr) = (Mi::sop, Mi::eop, Mi::attr);",
            kw("DRCT")
        ));

        Ok(f.finish())
    }

    fn emit_node(
        &mut self,
        f: &mut CodeFormatter,
        node: &SpdInstr,
        lane: u64,
    ) -> Result<(), EmitError> {
        match &node.instr.kind {
            InstrKind::Load(_) => {
                // an offset-0 read is just the input port itself
                if node.stream_offset == 0 {
                    return Ok(());
                }
                let sym = self.symbol(node.id(), lane)?;
                let port = self.load_port(node, lane);
                let (func, magnitude) = if node.stream_offset > 0 {
                    ("spd_shift_forward", node.stream_offset)
                } else {
                    ("spd_shift_backward", -node.stream_offset)
                };
                let prefix = self.equ_prefix();
                f.writeln(&format!("{}{} = {}({}, {});", prefix, sym, func, port, magnitude));
            }
            InstrKind::Binary { op, lhs, rhs } => {
                let sym = self.symbol(node.id(), lane)?;
                let lhs = self.operand(lhs, lane)?;
                let rhs = self.operand(rhs, lane)?;
                let prefix = self.equ_prefix();
                f.writeln(&format!(
                    "{}{} = {} {} {};",
                    prefix,
                    sym,
                    lhs,
                    op_token(*op),
                    rhs
                ));
            }
            InstrKind::Store { access, value } => {
                let info = self
                    .ir
                    .array_info(access.array)
                    .expect("write arrays are registered during construction");
                let port = format!("{}_out{}", info.name, lane);
                let new_value = self.operand(value, lane)?;
                let mask_id = self.mask_source(node)?;
                let mask = self.symbol(mask_id, lane)?;
                let prefix = self.equ_prefix();
                f.writeln(&format!(
                    "{}{} = (attr[{}]) ? {} : {};",
                    prefix, port, lane, new_value, mask
                ));
            }
            InstrKind::Other(what) => {
                return Err(EmitError::UnsupportedOpcode {
                    opcode: what.clone(),
                });
            }
        }
        Ok(())
    }

    fn equ_prefix(&mut self) -> String {
        let prefix = format!("{}equ{}, ", kw("EQU"), self.equ_count);
        self.equ_count += 1;
        prefix
    }

    /// The symbol naming `id`'s value in lane `lane`: the input port for
    /// an offset-0 read, a numbered wire otherwise.
    fn symbol(&mut self, id: InstrId, lane: u64) -> Result<String, EmitError> {
        let node = self.ir.find(id).ok_or_else(|| EmitError::UnsupportedOpcode {
            opcode: format!("operand {} is not in the dataflow graph", id),
        })?;

        if node.may_read() && node.stream_offset == 0 {
            return Ok(self.load_port(node, lane));
        }

        let num = match self.value_nums.get(&id) {
            Some(&n) => n,
            None => {
                let n = self.next_value;
                self.next_value += 1;
                self.value_nums.insert(id, n);
                n
            }
        };
        Ok(format!("n{}_{}", num, lane))
    }

    fn load_port(&self, node: &SpdInstr, lane: u64) -> String {
        let access = node
            .access()
            .expect("only memory reads resolve to input ports");
        let info = self
            .ir
            .array_info(access.array)
            .expect("read arrays are registered during construction");
        format!("{}_in{}", info.name, lane)
    }

    fn operand(&mut self, op: &Operand, lane: u64) -> Result<String, EmitError> {
        match op {
            Operand::Instr(id) => self.symbol(*id, lane),
            Operand::ConstInt { value, bits } => Ok(format_int(*value, *bits)),
            Operand::ConstFloat(c) => format_float(c, self.allow_extended),
        }
    }

    /// Find the pass-through value for a masked write: the unique
    /// offset-0 memory read in the stored operand's defining chain whose
    /// stream slot equals the write's slot. Memoized per store.
    fn mask_source(&mut self, store: &SpdInstr) -> Result<InstrId, EmitError> {
        if let Some(&cached) = self.mask_cache.get(&store.id()) {
            return Ok(cached);
        }

        let access = store
            .access()
            .expect("mask search starts from a memory write");
        let info = self
            .ir
            .array_info(access.array)
            .expect("write arrays are registered during construction");
        let write_slot = info.offset;

        let mut stack = store.instr.instr_operands();
        let mut seen: HashSet<InstrId> = HashSet::new();
        let mut candidates: Vec<InstrId> = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = match self.ir.find(id) {
                Some(n) => n,
                None => continue,
            };
            if node.may_read() {
                if node.stream_offset == 0 {
                    let slot = self
                        .ir
                        .array_info(node.access().expect("reads carry an access").array)
                        .expect("read arrays are registered during construction")
                        .offset;
                    if slot == write_slot {
                        candidates.push(id);
                    }
                }
            } else {
                stack.extend(node.instr.instr_operands());
            }
        }

        if candidates.len() == 1 {
            self.mask_cache.insert(store.id(), candidates[0]);
            Ok(candidates[0])
        } else {
            Err(EmitError::AmbiguousMaskSource {
                array: info.name.clone(),
                candidates: candidates.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{BinOp, Region, RegionBuilder};

    /// `C[i][j] = A[i][j] + B[i][j]` over i,j in [0,3].
    fn elementwise_add() -> Region {
        let mut b = RegionBuilder::new("vadd2d");
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

    /// `B[i] = (A[i-1] + A[i]) + A[i+1]`, one read array, one write array.
    fn stencil() -> Region {
        let mut b = RegionBuilder::new("stencil1d");
        let a = b.array("A", &[8]);
        let out = b.array("B", &[8]);
        let mut s = b.statement(&[(0, 5)]);
        let l0 = s.load(a, &[0]);
        let l1 = s.load(a, &[1]);
        let l2 = s.load(a, &[2]);
        let t = s.binary(BinOp::FAdd, l0, l1);
        let t2 = s.binary(BinOp::FAdd, t, l2);
        s.store(out, &[1], t2);
        s.finish().finish()
    }

    #[test]
    fn test_scalar_emission_exact() {
        let ir = SpdIr::build(&elementwise_add(), 0).unwrap();
        let out = Printer::new(&ir).emit(&KernelMeta::scalar(0)).unwrap();

        let expected = "\
// Module kernel0
Name      kernel0;
Main_In   {Mi::A_in0, B_in0, sop, eop, attr};
Main_Out  {Mo::C_out0, sop, eop, attr};

// equation
EQU       equ0, n0_0 = A_in0 + B_in0;
EQU       equ1, C_out0 = (attr[0]) ? n0_0 : A_in0;

// direct connection
DRCT      (Mo::sop, Mo::eop, Mo::attr) = (Mi::sop, Mi::eop, Mi::attr);
";
        assert_eq!(out.kernel.contents, expected);
        assert_eq!(out.kernel.filename, "kernel0.spd");
        assert_eq!(out.latency, 2);
        assert!(out.wrapper.is_none());
    }

    #[test]
    fn test_scalar_round_trip_properties() {
        let ir = SpdIr::build(&elementwise_add(), 0).unwrap();
        let out = Printer::new(&ir).emit(&KernelMeta::scalar(0)).unwrap();
        let text = &out.kernel.contents;

        let arith: Vec<&str> = text.lines().filter(|l| l.contains(" + ")).collect();
        assert_eq!(arith.len(), 1);
        assert!(arith[0].contains("A_in0 + B_in0"));
        let masked: Vec<&str> = text.lines().filter(|l| l.contains("attr[0]) ?")).collect();
        assert_eq!(masked.len(), 1);
    }

    #[test]
    fn test_vectorized_emission_vl3() {
        let ir = SpdIr::build(&elementwise_add(), 0).unwrap();
        let meta = KernelMeta {
            region_number: 0,
            vector_length: 3,
            unroll_count: 1,
            switch_in_out: false,
        };
        let out = Printer::new(&ir).emit(&meta).unwrap();
        let text = &out.kernel.contents;

        assert!(text.contains("Main_In   {Mi::A_in0, A_in1, A_in2, B_in0, B_in1, B_in2, sop, eop, attr};"));
        assert!(text.contains("Main_Out  {Mo::C_out0, C_out1, C_out2, sop, eop, attr};"));

        let arith: Vec<&str> = text.lines().filter(|l| l.contains(" + ")).collect();
        assert_eq!(arith.len(), 3);
        for (lane, line) in arith.iter().enumerate() {
            assert!(line.contains(&format!("A_in{} + B_in{}", lane, lane)));
            assert!(line.contains(&format!("n0_{}", lane)));
        }
        for lane in 0..3 {
            assert!(text.contains(&format!("C_out{} = (attr[{}]) ?", lane, lane)));
        }
        // EQU labels keep counting across lanes
        assert!(text.contains("equ5,"));
        assert_eq!(out.latency, 6);
    }

    #[test]
    fn test_shift_emission() {
        let ir = SpdIr::build(&stencil(), 1).unwrap();
        let out = Printer::new(&ir).emit(&KernelMeta::scalar(1)).unwrap();
        let text = &out.kernel.contents;

        assert!(text.contains("= spd_shift_backward(A_in0, 1);"));
        assert!(text.contains("= spd_shift_forward(A_in0, 1);"));
        // the offset-0 read feeds the mask directly
        assert!(text.contains(": A_in0;"));
    }

    #[test]
    fn test_unrolled_wrapper_exact() {
        let ir = SpdIr::build(&stencil(), 5).unwrap();
        let meta = KernelMeta {
            region_number: 5,
            vector_length: 1,
            unroll_count: 2,
            switch_in_out: false,
        };
        let out = Printer::new(&ir).emit(&meta).unwrap();
        // shifts x2, adds x2, store: 5 EQU statements
        assert_eq!(out.latency, 5);

        let wrapper = out.wrapper.expect("unroll count 2 produces a wrapper");
        assert_eq!(wrapper.filename, "UC2_kernel5.spd");
        let expected = "\
// Module UC2_kernel5
Name      UC2_kernel5;
Main_In   {Mi::A_in0, sop, eop, iattr};
Main_Out  {Mo::B_out0, sop, eop, oattr};

// equation
HDL       core0, 5, (u0_0, u0_1, u0_2, u0_3) = kernel5(A_in0, sop, eop, iattr);
HDL       core1, 5, (B_out0, sop, eop, oattr) = kernel5(u0_0, u0_1, u0_2, u0_3);
";
        assert_eq!(wrapper.contents, expected);
    }

    #[test]
    fn test_wrapper_arity_mismatch() {
        // two reads, one write: the stages cannot be chained positionally
        let ir = SpdIr::build(&elementwise_add(), 0).unwrap();
        let meta = KernelMeta {
            region_number: 0,
            vector_length: 1,
            unroll_count: 2,
            switch_in_out: false,
        };
        let err = Printer::new(&ir).emit(&meta).unwrap_err();
        assert!(matches!(err, EmitError::PipelineArityMismatch { num_reads: 2, num_writes: 1 }));
    }

    #[test]
    fn test_mask_source_requires_unique_read() {
        // stored value is a constant: no pass-through read exists
        let mut b = RegionBuilder::new("konst");
        let a = b.array("A", &[4]);
        let c = b.array("C", &[4]);
        let mut s = b.statement(&[(0, 3)]);
        let _la = s.load(a, &[0]);
        s.store(
            c,
            &[0],
            Operand::ConstFloat(FloatConst::Single(1.0)),
        );
        let ir = SpdIr::build(&s.finish().finish(), 0).unwrap();
        let err = Printer::new(&ir).emit(&KernelMeta::scalar(0)).unwrap_err();
        assert!(matches!(
            err,
            EmitError::AmbiguousMaskSource { candidates: 0, .. }
        ));
    }

    #[test]
    fn test_emit_to_skips_unwritable_directory() {
        // file failure is reported and skipped; emission still succeeds
        let ir = SpdIr::build(&elementwise_add(), 0).unwrap();
        let dir = Path::new("/nonexistent/spdgen_out");
        let out = Printer::new(&ir)
            .emit_to(&KernelMeta::scalar(0), dir)
            .unwrap();
        assert!(!out.kernel.contents.is_empty());
        assert!(!dir.join(&out.kernel.filename).exists());
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(1, 1), "true");
        assert_eq!(format_int(0, 1), "false");
        assert_eq!(format_int(42, 32), "42");
        assert_eq!(format_int(-7, 64), "-7");
    }

    #[test]
    fn test_format_float_scalar_variant() {
        assert_eq!(format_float(&FloatConst::Single(1.5), false).unwrap(), "1.5");
        assert_eq!(format_float(&FloatConst::Single(0.0), false).unwrap(), "0");
        assert!(format_float(&FloatConst::Single(f32::INFINITY), false).is_err());
        assert!(format_float(&FloatConst::Double(2.5), false).is_err());
        assert!(format_float(&FloatConst::Half(0x3C00), false).is_err());
    }

    #[test]
    fn test_format_float_extended_variant() {
        assert_eq!(format_float(&FloatConst::Double(2.5), true).unwrap(), "2.5");
        assert_eq!(
            format_float(&FloatConst::Single(f32::INFINITY), true).unwrap(),
            "0x7FF0000000000000"
        );
        assert_eq!(
            format_float(&FloatConst::Double(f64::NEG_INFINITY), true).unwrap(),
            "0xFFF0000000000000"
        );
        assert_eq!(
            format_float(
                &FloatConst::X87 {
                    hi: 0x3FFF,
                    lo: 0x8000000000000000
                },
                true
            )
            .unwrap(),
            "0xK3FFF8000000000000000"
        );
        // quad prints the low half first
        assert_eq!(
            format_float(&FloatConst::Quad { hi: 0x3FFF000000000000, lo: 1 }, true).unwrap(),
            "0xL00000000000000013FFF000000000000"
        );
        assert_eq!(
            format_float(&FloatConst::Half(0x3C00), true).unwrap(),
            "0xH3C00"
        );
    }

    #[test]
    fn test_op_tokens() {
        assert_eq!(op_token(BinOp::FAdd), "+");
        assert_eq!(op_token(BinOp::Sub), "-");
        assert_eq!(op_token(BinOp::FMul), "*");
        assert_eq!(op_token(BinOp::SDiv), "/");
    }
}
