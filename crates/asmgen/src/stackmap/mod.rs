//! Decoding the LLVM stack-map table from its directive rendering.
//!
//! The assembler output carries the `__LLVM_StackMaps` section as `.byte`,
//! `.short` and `.long` lines instead of raw bytes. Each callsite record is
//! laid out as:
//!
//! ```text
//! .long  <id low>          .long  <id high, ignored>
//! .long  <callsite>-<fn>   <reserved>
//! .short <location count>
//! per location:
//!   .byte  <kind>          <reserved>
//!   .short <size>
//!   .short <dwarf reg>     <reserved>
//!   .long  <offset or constant>
//! ```

pub mod cursor;
mod record;

use std::collections::BTreeMap;

use crate::Result;
use crate::abi::RECORD_ID_LINES;
use crate::label::Label;
use crate::translate::TranslateOptions;

pub use cursor::DirectiveCursor;
pub use record::{Location, LocationKind, Patchpoint};

/// Decoded patchpoints keyed by callsite label name; iteration follows label
/// order, not table order.
pub type PatchpointMap = BTreeMap<String, Patchpoint>;

/// Decode every record of the stack-map block among `labels`.
///
/// Input without a stack-map block has no patchpoints. When two records name
/// the same callsite label the later one wins.
pub fn decode_stack_map(labels: &[Label], options: &TranslateOptions) -> Result<PatchpointMap> {
    let mut patchpoints = PatchpointMap::new();

    let Some(table) = labels.iter().find(|l| l.name() == options.stack_map_label) else {
        tracing::debug!(label = %options.stack_map_label, "no stack map table in input");
        return Ok(patchpoints);
    };

    let mut cursor = DirectiveCursor::new(table.body());
    while cursor.seek_record(&options.temp_symbol_prefix, RECORD_ID_LINES)? {
        let patchpoint = read_patchpoint(&mut cursor)?;
        tracing::trace!(%patchpoint, "decoded patchpoint");
        if let Some(previous) = patchpoints.insert(patchpoint.label_name.clone(), patchpoint) {
            tracing::warn!(
                label = %previous.label_name,
                id = previous.id,
                "duplicate patchpoint label, keeping the later record"
            );
        }
    }

    tracing::debug!(count = patchpoints.len(), "decoded stack map");
    Ok(patchpoints)
}

/// Read one record starting at the cursor; leaves the cursor after its last field.
pub fn read_patchpoint(cursor: &mut DirectiveCursor<'_>) -> Result<Patchpoint> {
    let id = u64::from(cursor.read_u32()?);
    cursor.skip(); // high word

    let label_name = cursor.read_label_difference()?;
    cursor.skip(); // reserved

    let count = cursor.read_u16()?;
    let mut locations = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let kind = cursor.read_kind()?;
        cursor.skip(); // reserved byte
        let size = cursor.read_u16()?;
        let reg_no = cursor.read_u16()?;
        cursor.skip(); // reserved short
        let offset_or_constant = cursor.read_i32()?;
        locations.push(Location {
            kind,
            size,
            reg_no,
            offset_or_constant,
        });
    }

    Ok(Patchpoint {
        id,
        label_name,
        locations,
    })
}
