use chrono::NaiveDate;

/// `M{YYYYMMDD}`, the prefix shared by every menu scheduled on `menu_date`.
pub fn base_menu_id(menu_date: NaiveDate) -> String {
    format!("M{}", menu_date.format("%Y%m%d"))
}

/// Menu id for a caterer that already owns `existing` menus with the same base.
///
/// The first menu of the day takes the bare base; later ones get `_{n}` where
/// `n` is the menu's position for that caterer.
pub fn menu_id_for(menu_date: NaiveDate, existing: u64) -> String {
    let base = base_menu_id(menu_date);
    if existing == 0 {
        base
    } else {
        format!("{base}_{}", existing + 1)
    }
}

/// Path customers use to order from a menu.
pub fn order_link(menu_id: &str) -> String {
    format!("/order/{menu_id}")
}
