use std::fmt;

use crate::abi::{FUNCTION_END, INLINE_ASM_END, INLINE_ASM_START};
use crate::label::{SourceLine, sanitize};
use crate::{Error, Result};

use super::operand::Operand;

/// ARM condition code carried as a mnemonic suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Eq,
    Ne,
    Cs,
    Cc,
    Mi,
    Pl,
    Vs,
    Vc,
    Hi,
    Ls,
    Ge,
    Lt,
    Gt,
    Le,
    Always,
}

impl Condition {
    /// Suffixes checked against the end of a mnemonic, in this order.
    const SUFFIXES: [(&'static str, Condition); 14] = [
        ("eq", Condition::Eq),
        ("ne", Condition::Ne),
        ("cs", Condition::Cs),
        ("cc", Condition::Cc),
        ("mi", Condition::Mi),
        ("pl", Condition::Pl),
        ("vs", Condition::Vs),
        ("vc", Condition::Vc),
        ("hi", Condition::Hi),
        ("ls", Condition::Ls),
        ("ge", Condition::Ge),
        ("lt", Condition::Lt),
        ("gt", Condition::Gt),
        ("le", Condition::Le),
    ];

    /// Split `mnemonic` into bare mnemonic and condition.
    #[must_use]
    pub fn split(mnemonic: &str) -> (&str, Condition) {
        let mnemonic = mnemonic.trim();
        for (suffix, cond) in Self::SUFFIXES {
            if let Some(bare) = mnemonic.strip_suffix(suffix) {
                return (bare, cond);
            }
        }
        (mnemonic, Condition::Always)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::Always => "al",
            other => Self::SUFFIXES
                .iter()
                .find(|(_, c)| *c == other)
                .map_or("al", |(s, _)| *s),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a body line of a function block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    FunctionEnd,
    Directive,
    InlineAsmStart,
    InlineAsmEnd,
    Comment,
    Instruction,
}

impl LineKind {
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if text.trim().is_empty() {
            LineKind::Blank
        } else if text == FUNCTION_END {
            LineKind::FunctionEnd
        } else if text.starts_with('.') {
            LineKind::Directive
        } else if text == INLINE_ASM_START {
            LineKind::InlineAsmStart
        } else if text == INLINE_ASM_END {
            LineKind::InlineAsmEnd
        } else if text.starts_with('@') {
            LineKind::Comment
        } else {
            LineKind::Instruction
        }
    }
}

/// One translated instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Branch {
        mnemonic: String,
        target: String,
        cond: Condition,
    },
    /// `push {...}`: store multiple, decrement before.
    Push { regs: Operand, cond: Condition },
    /// `pop {...}`: load multiple, increment after.
    Pop { regs: Operand, cond: Condition },
    Generic {
        mnemonic: String,
        dst: String,
        operand: Operand,
        cond: Condition,
    },
}

impl Instruction {
    /// Parse one instruction line.
    ///
    /// `push`/`pop` are matched before the first comma is looked at, so a
    /// register list like `{r4, r5}` stays a single operand instead of being
    /// split into a destination and operands.
    pub fn parse(line: &SourceLine) -> Result<Self> {
        let text = line.text.as_str();
        let unsupported = || Error::UnsupportedInstruction {
            line: line.text.clone(),
            number: line.number,
        };

        let mut head = text.split_whitespace();
        let (mnemonic, cond) = Condition::split(head.next().ok_or_else(unsupported)?);

        // push/pop take a register list, which may itself contain commas.
        if mnemonic == "push" || mnemonic == "pop" {
            let rest = text
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim())
                .filter(|rest| !rest.is_empty())
                .ok_or_else(|| Error::format(text, line.number, "two elements"))?;
            let regs = Operand::parse(rest, line)?;
            return Ok(if mnemonic == "push" {
                Instruction::Push { regs, cond }
            } else {
                Instruction::Pop { regs, cond }
            });
        }

        let Some((before, operands)) = text.split_once(',') else {
            if !mnemonic.starts_with('b') {
                return Err(unsupported());
            }
            let [_, target] = two_tokens(text, line)?;
            return Ok(Instruction::Branch {
                mnemonic: mnemonic.to_string(),
                target: sanitize(target),
                cond,
            });
        };

        let [_, dst] = two_tokens(before, line)?;
        Ok(Instruction::Generic {
            mnemonic: mnemonic.to_string(),
            dst: dst.to_string(),
            operand: Operand::parse(operands, line)?,
            cond,
        })
    }
}

fn two_tokens<'a>(text: &'a str, line: &SourceLine) -> Result<[&'a str; 2]> {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) => Ok([first, second]),
        _ => Err(Error::format(&line.text, line.number, "two elements")),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Branch {
                mnemonic,
                target,
                cond,
            } => write!(f, "__ {mnemonic}(&{target}, {cond});"),
            Instruction::Push { regs, cond } => write!(f, "__ stm(db, sp, {regs}, {cond});"),
            Instruction::Pop { regs, cond } => write!(f, "__ ldm(ia, sp, {regs}, {cond});"),
            Instruction::Generic {
                mnemonic,
                dst,
                operand,
                cond: Condition::Always,
            } => write!(f, "__ {mnemonic}({dst}, {operand});"),
            Instruction::Generic {
                mnemonic,
                dst,
                operand,
                cond,
            } => write!(f, "__ {mnemonic}({dst}, {operand}, {cond});"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(text: &str) -> String {
        Instruction::parse(&SourceLine::new(1, text))
            .expect("instruction should translate")
            .to_string()
    }

    #[test]
    fn test_condition_split() {
        assert_eq!(Condition::split("beq"), ("b", Condition::Eq));
        assert_eq!(Condition::split("movne"), ("mov", Condition::Ne));
        assert_eq!(Condition::split("addgt"), ("add", Condition::Gt));
        assert_eq!(Condition::split("mov"), ("mov", Condition::Always));
        assert_eq!(Condition::split("bl"), ("bl", Condition::Always));
    }

    #[test]
    fn test_condition_names() {
        for (suffix, cond) in Condition::SUFFIXES {
            assert_eq!(cond.as_str(), suffix);
        }
        assert_eq!(Condition::Always.to_string(), "al");
    }

    #[test]
    fn test_classify() {
        assert_eq!(LineKind::classify(""), LineKind::Blank);
        assert_eq!(LineKind::classify(".fnend"), LineKind::FunctionEnd);
        assert_eq!(LineKind::classify(".save {r11, lr}"), LineKind::Directive);
        assert_eq!(LineKind::classify("@APP"), LineKind::InlineAsmStart);
        assert_eq!(LineKind::classify("@NO_APP"), LineKind::InlineAsmEnd);
        assert_eq!(LineKind::classify("@ InlineAsm Start"), LineKind::Comment);
        assert_eq!(LineKind::classify("mov r0, r1"), LineKind::Instruction);
    }

    #[test]
    fn test_branch() {
        assert_eq!(translate("beq .Lfoo"), "__ b(&Lfoo, eq);");
        assert_eq!(translate("b .LBB0_2"), "__ b(&LBB0_2, al);");
        assert_eq!(translate("bl callee"), "__ bl(&callee, al);");
    }

    #[test]
    fn test_branch_needs_one_target() {
        assert!(matches!(
            Instruction::parse(&SourceLine::new(3, "b")),
            Err(Error::Format { number: 3, .. })
        ));
    }

    #[test]
    fn test_push_pop() {
        assert_eq!(translate("push {lr}"), "__ stm(db, sp, ((1 << lr.code())), al);");
        assert_eq!(
            translate("pop {r4, pc}"),
            "__ ldm(ia, sp, ((1 << r4.code())|(1 << pc.code())), al);"
        );
        assert_eq!(
            translate("popne {r11}"),
            "__ ldm(ia, sp, ((1 << r11.code())), ne);"
        );
    }

    #[test]
    fn test_generic() {
        assert_eq!(translate("mov r0, r1"), "__ mov(r0, Operand(r1));");
        assert_eq!(translate("movne r0, #1"), "__ mov(r0, Operand(1), ne);");
        assert_eq!(translate("ldr r0, [sp, #4]"), "__ ldr(r0, MemOperand(sp, 4));");
        assert_eq!(translate("add r0, r1, #4"), "__ add(r0, r1, Operand(4));");
        assert_eq!(
            translate("add r0, r1, r2, lsl #2"),
            "__ add(r0, r1, Operand(r2, LSL, 2));"
        );
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            Instruction::parse(&SourceLine::new(9, "nop")),
            Err(Error::UnsupportedInstruction { number: 9, .. })
        ));
        assert!(matches!(
            Instruction::parse(&SourceLine::new(9, "svc #0")),
            Err(Error::UnsupportedInstruction { .. })
        ));
    }

    #[test]
    fn test_generic_needs_mnemonic_and_destination() {
        assert!(matches!(
            Instruction::parse(&SourceLine::new(4, "strd r0 r1, [sp]")),
            Err(Error::Format { number: 4, .. })
        ));
    }
}
