//! Test harness for asmgen unit and integration tests
//!
//! Builds assembly inputs with an embedded stack-map table and inspects the
//! translated output line by line.
//!
//! # Example
//!
//! ```rust
//! use asmgen::test_harness::*;
//!
//! let source = assembly(
//!     &[PatchpointSpec::new(7, ".Ltmp0").indirect_sp(8)],
//!     &["f:", "mov r0, r1", ".Ltmp0:", "bx lr"],
//! );
//! let output = translate_lines(&source).expect("Failed to translate");
//! assert_has_line(&output, "\tsafepoint.DefinePointerSlot(2, zone);");
//! assert_has_line(&output, "__ mov(r0, Operand(r1));");
//! ```

#![allow(
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::manual_assert
)]

use crate::abi::{STACK_MAP_LABEL, STACK_PTR_DWARF_REG};
use crate::stackmap::LocationKind;
use crate::{Result, TranslateOptions, translate_with_options};

/// Name of the function every encoded record is relative to.
pub const FUNCTION_SYMBOL: &str = "func";

/// A stack-map record to encode, with the callsite symbol spelled as it
/// appears in the assembly (e.g. `.Ltmp0`).
#[derive(Debug, Clone)]
pub struct PatchpointSpec {
    pub id: u64,
    pub symbol: String,
    /// `(kind byte, size, dwarf reg, offset or constant)`
    pub locations: Vec<(u8, u16, u16, i32)>,
}

impl PatchpointSpec {
    pub fn new(id: u64, symbol: &str) -> Self {
        Self {
            id,
            symbol: symbol.to_string(),
            locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn location(mut self, kind: LocationKind, size: u16, reg_no: u16, offset: i32) -> Self {
        self.locations.push((kind as u8, size, reg_no, offset));
        self
    }

    /// Add a location with a raw kind byte, valid or not.
    #[must_use]
    pub fn raw_location(mut self, kind: u8, size: u16, reg_no: u16, offset: i32) -> Self {
        self.locations.push((kind, size, reg_no, offset));
        self
    }

    /// Add a 4-byte `Indirect [sp + offset]` location.
    #[must_use]
    pub fn indirect_sp(self, offset: i32) -> Self {
        self.location(LocationKind::Indirect, 4, STACK_PTR_DWARF_REG, offset)
    }
}

/// Render records as the `.byte`/`.short`/`.long` lines LLVM prints for a
/// stack-map section, including its header and per-record padding.
pub fn encode_stack_map(records: &[PatchpointSpec]) -> Vec<String> {
    let mut lines = vec![
        format!("{STACK_MAP_LABEL}:"),
        ".byte 3".to_string(),
        ".byte 0".to_string(),
        ".short 0".to_string(),
        ".long 1".to_string(),
        ".long 0".to_string(),
        format!(".long {}", records.len()),
        format!(".long {FUNCTION_SYMBOL}"),
        ".long 0".to_string(),
        format!(".long {}", records.len()),
        ".long 0".to_string(),
    ];

    for record in records {
        lines.push(format!(".long {}", record.id & 0xffff_ffff));
        lines.push(format!(".long {}", record.id >> 32));
        lines.push(format!(".long {}-{FUNCTION_SYMBOL}", record.symbol));
        lines.push(".short 0".to_string());
        lines.push(format!(".short {}", record.locations.len()));
        for &(kind, size, reg_no, offset) in &record.locations {
            lines.push(format!(".byte {kind}"));
            lines.push(".byte 0".to_string());
            lines.push(format!(".short {size}"));
            lines.push(format!(".short {reg_no}"));
            lines.push(".short 0".to_string());
            lines.push(format!(".long {offset}"));
        }
        lines.push(".p2align 3".to_string());
        lines.push(".short 0".to_string());
        lines.push(".short 0".to_string());
        lines.push(".p2align 3".to_string());
    }
    lines
}

/// Join function lines and an encoded stack map into one assembly source.
pub fn assembly(records: &[PatchpointSpec], function: &[&str]) -> String {
    let mut out = String::from(".text\n.syntax unified\n");
    for line in function {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(".section .llvm_stackmaps\n");
    for line in encode_stack_map(records) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Translate with default options and split the output into lines.
pub fn translate_lines(source: &str) -> Result<Vec<String>> {
    translate_lines_with_options(source, &TranslateOptions::default())
}

pub fn translate_lines_with_options(
    source: &str,
    options: &TranslateOptions,
) -> Result<Vec<String>> {
    let output = translate_with_options(source, options)?;
    Ok(output.lines().map(str::to_string).collect())
}

/// Number of output lines equal to `line`.
pub fn count_line(output: &[String], line: &str) -> usize {
    output.iter().filter(|l| *l == line).count()
}

/// Assert that `line` appears in the output.
pub fn assert_has_line(output: &[String], line: &str) {
    if count_line(output, line) == 0 {
        panic!(
            "Line `{line}` not found in output:\n{}",
            output.join("\n")
        );
    }
}

/// Assert that no output line contains `needle`.
pub fn assert_no_line_containing(output: &[String], needle: &str) {
    if let Some(found) = output.iter().find(|l| l.contains(needle)) {
        panic!("Unexpected line `{found}` in output:\n{}", output.join("\n"));
    }
}

/// Assert that `expected` appears as a contiguous run of output lines.
pub fn assert_has_sequence(output: &[String], expected: &[&str]) {
    let found = output
        .windows(expected.len())
        .any(|window| window.iter().zip(expected).all(|(a, b)| a == b));
    if !found {
        panic!(
            "Sequence {expected:?} not found in output:\n{}",
            output.join("\n")
        );
    }
}
