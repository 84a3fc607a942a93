//! Pure translation between wire-facing shapes and the stored entity.
//!
//! Stateless and side-effect free; no I/O and no validation. The merge is
//! the null-ignoring partial update used by PATCH-style flows: supplied
//! fields overwrite, absent fields are preserved, and the id cannot be
//! touched because no request shape carries one.

use crate::catalog::item::{Item, ItemPatch, ItemRequest, ItemView, NewItem};

/// Build a not-yet-persisted item for create flows. Fields are copied
/// verbatim from the (pre-validated) request.
pub fn to_item(request: &ItemRequest) -> NewItem {
    NewItem {
        name: request.name.clone(),
        price: request.price,
    }
}

/// Read-side projection; total for any well-formed item.
pub fn to_view(item: &Item) -> ItemView {
    ItemView {
        id: item.id,
        name: item.name.clone(),
        price: item.price,
    }
}

/// Apply a patch in place. Idempotent: applying the same patch twice is
/// the same as applying it once. Per-field application order does not
/// matter; conflicting patches applied in sequence are last-write-wins.
pub fn merge_into(target: &mut Item, patch: &ItemPatch) {
    if let Some(name) = &patch.name {
        target.name = name.clone();
    }
    if let Some(price) = patch.price {
        target.price = price;
    }
}
