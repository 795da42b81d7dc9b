// Safepoint registration for patchpoint labels.
//
// Only stack-indirect locations are materialized as pointer slots; other
// location kinds carry no slot and are skipped.

use std::collections::HashSet;

use crate::abi::POINTER_SIZE;
use crate::stackmap::{LocationKind, Patchpoint};
use crate::{Error, Result};

use super::emitter::Emitter;

/// Emit the safepoint block for `patchpoint`.
///
/// Each distinct `sp`-relative offset registers one pointer slot at
/// `offset / POINTER_SIZE`.
pub fn materialize(patchpoint: &Patchpoint, stack_ptr_reg: u16, out: &mut Emitter) -> Result<()> {
    let mut seen_offsets = HashSet::new();

    out.emit(format!(
        "// FIXME: handle patch point {} here!",
        patchpoint.label_name
    ));
    out.emit("{");
    out.emit(
        "\tSafepoint safepoint = safepoint_builder->DefineSafepoint(asm, Safepoint::kSimple, 0, Safepoint::kLazyDeopt /* assume need frame */);",
    );
    for location in &patchpoint.locations {
        if location.kind != LocationKind::Indirect {
            tracing::trace!(%location, "location kind not materialized");
            continue;
        }
        if location.reg_no != stack_ptr_reg {
            return Err(Error::UnsupportedAddressing {
                location: *location,
                label: patchpoint.label_name.clone(),
            });
        }
        if seen_offsets.insert(location.offset_or_constant) {
            let slot = location.offset_or_constant.div_euclid(POINTER_SIZE);
            out.emit(format!("\tsafepoint.DefinePointerSlot({slot}, zone);"));
        }
    }
    out.emit("}");
    Ok(())
}
