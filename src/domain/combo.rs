use std::collections::HashSet;

use crate::{error::AppError, models::ComboItem};

pub const MAX_COMBO_NAME_LEN: usize = 100;

/// Shape checks that run before the catalog is consulted.
pub fn check_combo_items(items: &[ComboItem]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::BadRequest(
            "Combo must contain at least one item".into(),
        ));
    }

    let mut seen = HashSet::with_capacity(items.len());
    if !items.iter().all(|item| seen.insert(item.menu_item_id)) {
        return Err(AppError::BadRequest(
            "Combo cannot contain duplicate items".into(),
        ));
    }

    if let Some(item) = items.iter().find(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest(format!(
            "Quantity for menu item {} must be greater than 0",
            item.menu_item_id
        )));
    }

    Ok(())
}

pub fn check_combo_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_COMBO_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "Combo name must be between 1 and {MAX_COMBO_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Fails with every requested id missing from `existing`, in request order.
pub fn ensure_items_exist(requested: &[i32], existing: &HashSet<i32>) -> Result<(), AppError> {
    let missing: Vec<i32> = requested
        .iter()
        .copied()
        .filter(|id| !existing.contains(id))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Menu items not found: {missing:?}"
        )))
    }
}
