// Operand text → macro-assembler operand expression.
//
// The operand list is classified once into an `Operand` shape; rendering is
// done by `Display` so every shape has exactly one spelling.

use std::fmt;

use crate::label::SourceLine;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl ShiftKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lsl" => Some(ShiftKind::Lsl),
            "lsr" => Some(ShiftKind::Lsr),
            "asr" => Some(ShiftKind::Asr),
            "ror" => Some(ShiftKind::Ror),
            _ => None,
        }
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShiftKind::Lsl => "LSL",
            ShiftKind::Lsr => "LSR",
            ShiftKind::Asr => "ASR",
            ShiftKind::Ror => "ROR",
        })
    }
}

/// A shift applied to a register operand, e.g. `lsl #2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub kind: ShiftKind,
    pub amount: String,
}

impl Shift {
    /// Parse `<shiftname> <value>`.
    ///
    /// `None` when the text does not start with a shift name; `Some(Err(()))`
    /// when it does but is not followed by exactly one value.
    fn classify(text: &str) -> Option<std::result::Result<Self, ()>> {
        let mut tokens = text.split_whitespace();
        let kind = ShiftKind::from_name(tokens.next()?)?;
        Some(match (tokens.next(), tokens.next()) {
            (Some(value), None) => Ok(Shift {
                kind,
                amount: strip_hash(value).to_string(),
            }),
            _ => Err(()),
        })
    }
}

/// Addressing mode of a memory operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    /// `[base, off]`
    Offset,
    /// `[base, off]!`
    PreIndex,
    /// `[base], off`
    PostIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemOffset {
    None,
    Immediate(String),
    ShiftedIndex { index: String, shift: Shift },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `[r0, #4]` and friends.
    Memory {
        base: String,
        offset: MemOffset,
        mode: AddrMode,
    },
    /// `#5`
    Immediate(String),
    /// `{r4, r5, lr}`
    RegisterList(Vec<String>),
    /// `r1`
    Register(String),
    /// `r1, lsl #2`
    ShiftedRegister { reg: String, shift: Shift },
    /// `r1, r2` or `r1, #4`: a second source register followed by a plain operand.
    RegisterThen { reg: String, operand: String },
    /// `r1, r2, lsl #2`
    RegisterThenShifted {
        reg: String,
        base: String,
        shift: Shift,
    },
    /// Three elements with an explicit immediate last, passed through unchanged.
    Passthrough(Vec<String>),
}

impl Operand {
    /// Classify the operand text of `line` (everything after the destination).
    pub fn parse(text: &str, line: &SourceLine) -> Result<Self> {
        let text = text.trim();
        let fail = |expected: &str| Error::format(&line.text, line.number, expected);

        if let Some(rest) = text.strip_prefix('[') {
            return parse_memory(rest).ok_or_else(|| fail("a memory operand"));
        }
        if let Some(value) = text.strip_prefix('#') {
            return Ok(Operand::Immediate(value.to_string()));
        }
        if let Some(rest) = text.strip_prefix('{') {
            let inner = rest
                .strip_suffix('}')
                .ok_or_else(|| fail("a closing `}` in register list"))?;
            return Ok(Operand::RegisterList(split_elements(inner)));
        }

        let elements = split_elements(text);
        match elements.as_slice() {
            [reg] => Ok(Operand::Register(reg.clone())),
            [reg, second] => {
                let second = strip_hash(second);
                match Shift::classify(second) {
                    Some(Ok(shift)) => Ok(Operand::ShiftedRegister {
                        reg: reg.clone(),
                        shift,
                    }),
                    Some(Err(())) => Err(fail("a shift amount")),
                    None => Ok(Operand::RegisterThen {
                        reg: reg.clone(),
                        operand: second.to_string(),
                    }),
                }
            }
            [reg, base, third] => {
                if third.starts_with('#') {
                    return Ok(Operand::Passthrough(vec![
                        reg.clone(),
                        base.clone(),
                        third.clone(),
                    ]));
                }
                match Shift::classify(third) {
                    Some(Ok(shift)) => Ok(Operand::RegisterThenShifted {
                        reg: reg.clone(),
                        base: base.clone(),
                        shift,
                    }),
                    _ => Err(fail("a shift operand as third element")),
                }
            }
            _ => Err(fail("at most three operand elements")),
        }
    }
}

/// Parse the text after `[`.
fn parse_memory(rest: &str) -> Option<Operand> {
    let (inner, trailing) = rest.split_once(']')?;
    let trailing = trailing.trim();
    let elements = split_elements(inner);

    let (mode, post_offset) = if trailing.is_empty() {
        (AddrMode::Offset, None)
    } else if trailing == "!" {
        (AddrMode::PreIndex, None)
    } else {
        let offset = trailing.strip_prefix(',')?.trim();
        if offset.is_empty() || offset.contains(',') {
            return None;
        }
        (AddrMode::PostIndex, Some(strip_hash(offset).to_string()))
    };

    let (base, offset) = match (elements.as_slice(), post_offset) {
        ([base], Some(off)) => (base, MemOffset::Immediate(off)),
        ([base], None) => (base, MemOffset::None),
        ([base, off], None) => (base, MemOffset::Immediate(strip_hash(off).to_string())),
        ([base, index, shift], None) => {
            let shift = Shift::classify(shift)?.ok()?;
            (
                base,
                MemOffset::ShiftedIndex {
                    index: index.clone(),
                    shift,
                },
            )
        }
        _ => return None,
    };

    Some(Operand::Memory {
        base: base.clone(),
        offset,
        mode,
    })
}

fn split_elements(text: &str) -> Vec<String> {
    text.split(',').map(|e| e.trim().to_string()).collect()
}

fn strip_hash(text: &str) -> &str {
    text.strip_prefix('#').unwrap_or(text)
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Memory { base, offset, mode } => {
                write!(f, "MemOperand({base}")?;
                match offset {
                    MemOffset::None if *mode != AddrMode::Offset => write!(f, ", 0")?,
                    MemOffset::None => {}
                    MemOffset::Immediate(off) => write!(f, ", {off}")?,
                    MemOffset::ShiftedIndex { index, shift } => {
                        write!(f, ", {index}, {}, {}", shift.kind, shift.amount)?;
                    }
                }
                match mode {
                    AddrMode::Offset => {}
                    AddrMode::PreIndex => write!(f, ", PreIndex")?,
                    AddrMode::PostIndex => write!(f, ", PostIndex")?,
                }
                write!(f, ")")
            }
            Operand::Immediate(value) => write!(f, "Operand({value})"),
            Operand::RegisterList(regs) => {
                write!(f, "(")?;
                for (i, reg) in regs.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "(1 << {reg}.code())")?;
                }
                write!(f, ")")
            }
            Operand::Register(reg) => write!(f, "Operand({reg})"),
            Operand::ShiftedRegister { reg, shift } => {
                write!(f, "Operand({reg}, {}, {})", shift.kind, shift.amount)
            }
            Operand::RegisterThen { reg, operand } => write!(f, "{reg}, Operand({operand})"),
            Operand::RegisterThenShifted { reg, base, shift } => {
                write!(f, "{reg}, Operand({base}, {}, {})", shift.kind, shift.amount)
            }
            Operand::Passthrough(elements) => write!(f, "{}", elements.join(", ")),
        }
    }
}
