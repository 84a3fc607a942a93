//! Catalog item entity and its wire-facing shapes.
//!
//! `Item` is the persisted record; its id is assigned by the store and
//! immutable afterwards. `NewItem` carries the pre-persistence state, so
//! "id must be unset" is a compile-time fact rather than a nullable field.
//! Request shapes never carry an id.
//!
//! Constraint enforcement lives at the request boundary (`validate_request`
//! / `validate_patch`, called by the CLI before the service is invoked).
//! The service and mapper assume pre-validated input and copy values
//! verbatim.

use crate::core::error::ShelfError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MAX_NAME_LEN: usize = 120;
pub const MAX_PRICE_SCALE: u32 = 2;
/// Integer digits allowed in a price: NUMERIC(12,2) leaves 10 before the
/// decimal point.
pub const MAX_PRICE_INTEGER_DIGITS: u32 = 10;

/// The persisted catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

/// An item that has not been persisted yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: Decimal,
}

/// Full create/replace payload. Both fields are mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    pub price: Decimal,
}

/// Partial update payload. `None` means "not supplied, preserve the stored
/// value"; clearing a field is inexpressible because the data model has no
/// nullable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none()
    }
}

/// Read-only projection returned to callers; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

pub fn validate_name(name: &str) -> Result<(), ShelfError> {
    if name.trim().is_empty() {
        return Err(ShelfError::ValidationError(
            "Name is mandatory".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ShelfError::ValidationError(format!(
            "Name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

pub fn validate_price(price: Decimal) -> Result<(), ShelfError> {
    if price <= Decimal::ZERO {
        return Err(ShelfError::ValidationError(
            "Price must be greater than 0".to_string(),
        ));
    }
    if price.normalize().scale() > MAX_PRICE_SCALE {
        return Err(ShelfError::ValidationError(format!(
            "Price must have at most {} decimal places",
            MAX_PRICE_SCALE
        )));
    }
    if price >= Decimal::from(10u64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err(ShelfError::ValidationError(format!(
            "Price must have at most {} integer digits",
            MAX_PRICE_INTEGER_DIGITS
        )));
    }
    Ok(())
}

pub fn validate_request(request: &ItemRequest) -> Result<(), ShelfError> {
    validate_name(&request.name)?;
    validate_price(request.price)?;
    Ok(())
}

/// A patch must change at least one field, and every supplied field must
/// satisfy the same constraints as a full request.
pub fn validate_patch(patch: &ItemPatch) -> Result<(), ShelfError> {
    if patch.is_empty() {
        return Err(ShelfError::ValidationError(
            "at least one of name or price must be supplied".to_string(),
        ));
    }
    if let Some(name) = &patch.name {
        validate_name(name)?;
    }
    if let Some(price) = patch.price {
        validate_price(price)?;
    }
    Ok(())
}
