//! Target and input-convention constants.
//!
//! Everything the translator hard-codes about 32-bit ARM assembly as printed by
//! LLVM lives here, so the decoder, translator and tests agree on it.

// ── Registers ──

/// DWARF register number of `sp` on ARM.
/// Indirect stack-map locations must be based on this register.
pub const STACK_PTR_DWARF_REG: u16 = 13;

/// Size of a stack slot in bytes.
/// Pointer slot indices are `offset / POINTER_SIZE`.
pub const POINTER_SIZE: i32 = 4;

// ── Stack Map Table ──

/// Label of the stack-map section emitted by LLVM.
pub const STACK_MAP_LABEL: &str = "__LLVM_StackMaps";

/// Prefix of the temporary symbols LLVM places after each patchpoint call.
/// A `.long` whose value starts with this prefix is the callsite field of a record.
pub const TEMP_SYMBOL_PREFIX: &str = ".Ltmp";

/// Number of directive lines between the start of a record and its callsite field
/// (the low and high words of the 64-bit id).
pub const RECORD_ID_LINES: usize = 2;

// ── Directives and Markers ──

pub const BYTE_DIRECTIVE: &str = ".byte";
pub const SHORT_DIRECTIVE: &str = ".short";
pub const LONG_DIRECTIVE: &str = ".long";

/// Marks the end of a function body; nothing after it in the block is translated.
pub const FUNCTION_END: &str = ".fnend";

/// Start of a compiler-inserted inline assembly region.
pub const INLINE_ASM_START: &str = "@APP";

/// End of a compiler-inserted inline assembly region.
pub const INLINE_ASM_END: &str = "@NO_APP";

/// Characters removed from label names.
pub const LABEL_PUNCTUATION: [char; 4] = ['@', '%', ' ', '.'];
