//! Assembly → macro-assembler call translation.
//!
//! A run is a single owned [`Processor`] moved through its stages:
//! split the input into labeled blocks, decode the stack-map table, then
//! re-walk every block and render the generated code.

pub mod emitter;
pub mod instruction;
pub mod operand;
pub mod safepoint;

use crate::Result;
use crate::abi::{STACK_MAP_LABEL, STACK_PTR_DWARF_REG, TEMP_SYMBOL_PREFIX};
use crate::label::{Label, SourceLine, split_labels};
use crate::stackmap::{PatchpointMap, decode_stack_map};

pub use emitter::Emitter;
pub use instruction::{Condition, Instruction, LineKind};
pub use operand::Operand;

/// Input conventions the translator relies on.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Label of the stack-map table block.
    pub stack_map_label: String,
    /// Prefix of the callsite symbols referenced by stack-map records.
    pub temp_symbol_prefix: String,
    /// DWARF number of the register indirect locations must be based on.
    pub stack_pointer_reg: u16,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            stack_map_label: STACK_MAP_LABEL.to_string(),
            temp_symbol_prefix: TEMP_SYMBOL_PREFIX.to_string(),
            stack_pointer_reg: STACK_PTR_DWARF_REG,
        }
    }
}

/// Translate `source` with default options and return the generated code.
pub fn translate(source: &str) -> Result<String> {
    translate_with_options(source, &TranslateOptions::default())
}

pub fn translate_with_options(source: &str, options: &TranslateOptions) -> Result<String> {
    let processor = Processor::new(source, options.clone()).decode()?.translate()?;
    Ok(processor.render())
}

/// State of one translation run.
pub struct Processor {
    options: TranslateOptions,
    labels: Vec<Label>,
    patchpoints: PatchpointMap,
    emitter: Emitter,
    /// Set between `@APP` and `@NO_APP`; carries over block boundaries.
    inline_asm: bool,
}

impl Processor {
    /// Split `source` into labeled blocks.
    #[must_use]
    pub fn new(source: &str, options: TranslateOptions) -> Self {
        let lines = SourceLine::from_source(source);
        Self {
            options,
            labels: split_labels(&lines),
            patchpoints: PatchpointMap::new(),
            emitter: Emitter::new(),
            inline_asm: false,
        }
    }

    /// Decode the stack-map table into patchpoints.
    pub fn decode(mut self) -> Result<Self> {
        self.patchpoints = decode_stack_map(&self.labels, &self.options)?;
        Ok(self)
    }

    /// Walk every block in input order and emit its code.
    pub fn translate(mut self) -> Result<Self> {
        for label in &self.labels {
            self.emitter.bind(label.name());

            if let Some(patchpoint) = self.patchpoints.get(label.name()) {
                safepoint::materialize(
                    patchpoint,
                    self.options.stack_pointer_reg,
                    &mut self.emitter,
                )?;
                continue;
            }

            for line in label.body() {
                match LineKind::classify(&line.text) {
                    LineKind::Blank | LineKind::Directive | LineKind::Comment => {}
                    LineKind::FunctionEnd => break,
                    LineKind::InlineAsmStart => self.inline_asm = true,
                    LineKind::InlineAsmEnd => self.inline_asm = false,
                    LineKind::Instruction if self.inline_asm && line.text.starts_with("mov") => {
                        self.emitter.emit(format!("// needs to handle magic : {}", line.text));
                    }
                    LineKind::Instruction => {
                        let instruction = Instruction::parse(line)?;
                        tracing::trace!(line = line.number, %instruction, "translated");
                        self.emitter.emit(instruction.to_string());
                    }
                }
            }
        }

        tracing::debug!(
            labels = self.emitter.declarations().len(),
            lines = self.emitter.lines().len(),
            "translation finished"
        );
        Ok(self)
    }

    #[must_use]
    pub fn render(&self) -> String {
        self.emitter.render()
    }

    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    #[must_use]
    pub fn patchpoints(&self) -> &PatchpointMap {
        &self.patchpoints
    }

    #[must_use]
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}
