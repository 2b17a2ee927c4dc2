//! Patching deployed library addresses into contract bytecode.
//!
//! Hardhat's contract factories cannot link libraries at construction time, so
//! the creation code of a contract that calls an external library carries
//! 20-byte placeholder slots which must be overwritten with the library's
//! address before the contract is deployed.

use std::collections::HashMap;

use alloy::primitives::{Address, Bytes};
use itertools::Itertools;

use crate::{
    artifacts::{iter_slots, UnlinkedBytecode},
    constants::NUM_BYTES_ADDRESS,
    errors::LinkError,
};

/// Deployed library addresses, keyed by library name
pub type Libraries = HashMap<String, Address>;

/// Fill every placeholder slot in `unlinked` with the address of its library.
///
/// All slots are validated before any byte is written: every library must have
/// an address, every slot must be one address wide, lie inside the bytecode,
/// and not overlap another slot. The returned bytecode has the same length as
/// the input and differs from it only inside the slots.
pub fn link_libraries(
    unlinked: &UnlinkedBytecode,
    libraries: &Libraries,
) -> Result<Bytes, LinkError> {
    let code_len = unlinked.code.len();
    let mut patches: Vec<(usize, usize, &Address)> = Vec::new();
    for (library, slot) in iter_slots(&unlinked.link_references) {
        let address = libraries
            .get(library)
            .ok_or_else(|| LinkError::MissingLibrary(library.to_string()))?;

        if slot.length != NUM_BYTES_ADDRESS {
            return Err(LinkError::InvalidSlotLength {
                library: library.to_string(),
                length: slot.length,
            });
        }

        let end = slot.end().filter(|end| *end <= code_len).ok_or_else(|| {
            LinkError::OutOfBounds {
                library: library.to_string(),
                start: slot.start,
                code_len,
            }
        })?;

        patches.push((slot.start, end, address));
    }

    let overlap = patches
        .iter()
        .map(|&(start, end, _)| (start, end))
        .sorted_by_key(|&(start, _)| start)
        .tuple_windows()
        .find(|((_, a_end), (b_start, _))| b_start < a_end);
    if let Some(((first, _), (second, _))) = overlap {
        return Err(LinkError::OverlappingSlots { first, second });
    }

    let mut code = unlinked.code.clone();
    for (start, end, address) in patches {
        code[start..end].copy_from_slice(address.as_slice());
    }

    Ok(Bytes::from(code))
}
