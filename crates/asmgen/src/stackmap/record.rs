use std::fmt;

/// How a live value is located at a patchpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LocationKind {
    Register = 1,
    Direct = 2,
    Indirect = 3,
    Constant = 4,
    ConstantIndex = 5,
}

impl TryFrom<u8> for LocationKind {
    type Error = u8;

    fn try_from(kind: u8) -> Result<Self, Self::Error> {
        match kind {
            1 => Ok(LocationKind::Register),
            2 => Ok(LocationKind::Direct),
            3 => Ok(LocationKind::Indirect),
            4 => Ok(LocationKind::Constant),
            5 => Ok(LocationKind::ConstantIndex),
            other => Err(other),
        }
    }
}

impl LocationKind {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            LocationKind::Register => "Register",
            LocationKind::Direct => "Direct",
            LocationKind::Indirect => "Indirect",
            LocationKind::Constant => "Constant",
            LocationKind::ConstantIndex => "ConstantIndex",
        }
    }
}

/// One live-value slot of a patchpoint record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub kind: LocationKind,
    pub size: u16,
    /// DWARF register number.
    pub reg_no: u16,
    /// Byte offset for `Indirect`, literal value for `Constant`.
    pub offset_or_constant: i32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Location kind: {}, size: {}, regno: {}, offset_or_constant: {}",
            self.kind.name(),
            self.size,
            self.reg_no,
            self.offset_or_constant
        )
    }
}

/// One callsite record of the stack-map table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patchpoint {
    /// Low 32 bits of the record id; the high word is not kept.
    pub id: u64,
    pub label_name: String,
    pub locations: Vec<Location>,
}

impl fmt::Display for Patchpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PatchPoint ID: {}, label_name: {}, locations: [",
            self.id, self.label_name
        )?;
        for (i, location) in self.locations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{location}")?;
        }
        write!(f, "]")
    }
}
