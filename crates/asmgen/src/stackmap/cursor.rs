// Cursor over the data directives of the stack-map table.
//
// Every line of the table is lifted once into a `DataLine`; fields are then
// consumed in layout order with `expect`, which fails on the first line whose
// directive does not have the expected width.

use crate::abi::{BYTE_DIRECTIVE, LONG_DIRECTIVE, SHORT_DIRECTIVE};
use crate::label::{SourceLine, sanitize};
use crate::{Error, Result};

use super::LocationKind;

/// Width of a data directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Short,
    Long,
}

impl Width {
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Width::Byte => BYTE_DIRECTIVE,
            Width::Short => SHORT_DIRECTIVE,
            Width::Long => LONG_DIRECTIVE,
        }
    }

    #[must_use]
    pub fn from_directive(directive: &str) -> Option<Self> {
        match directive {
            BYTE_DIRECTIVE => Some(Width::Byte),
            SHORT_DIRECTIVE => Some(Width::Short),
            LONG_DIRECTIVE => Some(Width::Long),
            _ => None,
        }
    }

    /// Accepted value range, covering both signed and unsigned readings.
    fn range(self) -> (i64, i64) {
        match self {
            Width::Byte => (i64::from(i8::MIN), i64::from(u8::MAX)),
            Width::Short => (i64::from(i16::MIN), i64::from(u16::MAX)),
            Width::Long => (i64::from(i32::MIN), i64::from(u32::MAX)),
        }
    }
}

/// One line of the table split into `<directive> <value>`.
#[derive(Debug, Clone, Copy)]
struct DataLine<'a> {
    source: &'a SourceLine,
    /// `None` when the line does not have exactly two tokens.
    tokens: Option<(&'a str, &'a str)>,
}

impl<'a> DataLine<'a> {
    fn lift(source: &'a SourceLine) -> Self {
        let mut parts = source.text.split_whitespace();
        let tokens = match (parts.next(), parts.next(), parts.next()) {
            (Some(directive), Some(value), None) => Some((directive, value)),
            _ => None,
        };
        Self { source, tokens }
    }
}

/// A data value read from a directive of known width.
#[derive(Debug, Clone, Copy)]
pub struct Literal<'a> {
    pub value: i64,
    pub line: &'a SourceLine,
}

impl Literal<'_> {
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        (self.value & 0xff) as u8
    }

    #[must_use]
    pub fn as_u16(&self) -> u16 {
        (self.value & 0xffff) as u16
    }

    #[must_use]
    pub fn as_u32(&self) -> u32 {
        (self.value & 0xffff_ffff) as u32
    }

    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.as_u32() as i32
    }
}

pub struct DirectiveCursor<'a> {
    lines: Vec<DataLine<'a>>,
    pos: usize,
}

impl<'a> DirectiveCursor<'a> {
    #[must_use]
    pub fn new(lines: &'a [SourceLine]) -> Self {
        Self {
            lines: lines.iter().map(DataLine::lift).collect(),
            pos: 0,
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move to the start of the next record.
    ///
    /// Scans forward from the current position for a `.long` whose value starts
    /// with `prefix` (the callsite field) and positions the cursor `back` lines
    /// before it. Returns `false` when no record is left; the scan also ends at
    /// the first line that is not a two-token directive.
    pub fn seek_record(&mut self, prefix: &str, back: usize) -> Result<bool> {
        for idx in self.pos..self.lines.len() {
            let line = self.lines[idx];
            let Some((directive, value)) = line.tokens else {
                return Ok(false);
            };
            if directive != LONG_DIRECTIVE || !value.starts_with(prefix) {
                continue;
            }
            let Some(start) = idx.checked_sub(back) else {
                return Err(Error::format(
                    &line.source.text,
                    line.source.number,
                    format!("{back} id lines before the callsite"),
                ));
            };
            self.pos = start;
            return Ok(true);
        }
        Ok(false)
    }

    /// Advance past one reserved slot without inspecting it.
    pub fn skip(&mut self) {
        self.pos += 1;
    }

    /// Consume one line that must be a `width` directive with a numeric value.
    pub fn expect(&mut self, width: Width) -> Result<Literal<'a>> {
        let (line, raw) = self.expect_token(width)?;
        let value = parse_int(raw).ok_or_else(|| {
            Error::format(&line.text, line.number, format!("an integer {}", width.directive()))
        })?;
        let (min, max) = width.range();
        if value < min || value > max {
            return Err(Error::format(
                &line.text,
                line.number,
                format!("a value that fits {}", width.directive()),
            ));
        }
        Ok(Literal { value, line })
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.expect(Width::Short)?.as_u16())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.expect(Width::Long)?.as_u32())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.expect(Width::Long)?.as_i32())
    }

    pub fn read_kind(&mut self) -> Result<LocationKind> {
        let literal = self.expect(Width::Byte)?;
        LocationKind::try_from(literal.as_u8()).map_err(|kind| Error::UnknownKind {
            kind,
            line: literal.line.text.clone(),
            number: literal.line.number,
        })
    }

    /// Read a `.long A-B` label difference and return sanitized `A`.
    pub fn read_label_difference(&mut self) -> Result<String> {
        let (line, raw) = self.expect_token(Width::Long)?;
        match raw.split('-').collect::<Vec<_>>().as_slice() {
            [symbol, _base] => Ok(sanitize(symbol)),
            _ => Err(Error::format(
                &line.text,
                line.number,
                "a label difference `SYMBOL-SYMBOL`",
            )),
        }
    }

    fn expect_token(&mut self, width: Width) -> Result<(&'a SourceLine, &'a str)> {
        let Some(line) = self.lines.get(self.pos).copied() else {
            let (text, number) = self
                .lines
                .last()
                .map_or(("", 0), |l| (l.source.text.as_str(), l.source.number));
            return Err(Error::format(
                text,
                number,
                format!("a {} past the end of the stack map", width.directive()),
            ));
        };
        self.pos += 1;

        let Some((directive, value)) = line.tokens else {
            return Err(Error::format(&line.source.text, line.source.number, "two elements"));
        };
        if Width::from_directive(directive) != Some(width) {
            return Err(Error::format(
                &line.source.text,
                line.source.number,
                width.directive(),
            ));
        }
        Ok((line.source, value))
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (radix, digits) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => (16, hex),
        None => (10, digits),
    };
    // `from_str_radix` takes its own sign; only the one stripped above is allowed.
    if !digits.starts_with(|c: char| c.is_digit(radix)) {
        return None;
    }
    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
