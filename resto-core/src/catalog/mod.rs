//! Catalog rules
//!
//! - [`guard`]: a category can only be deleted while no menu item names it
//! - [`default_color`]: deterministic chip color for categories without one
//! - [`option_id`]: ids of size/extra entries derived from their names

pub mod guard;

pub use guard::{
    can_delete_category, delete_category, orphaned_items, referencing_items, rename_category,
};

/// Fixed category palette
pub const CATEGORY_PALETTE: [&str; 10] = [
    "#ef4444", // red
    "#f97316", // orange
    "#f59e0b", // amber
    "#84cc16", // lime
    "#10b981", // emerald
    "#06b6d4", // cyan
    "#3b82f6", // blue
    "#8b5cf6", // violet
    "#d946ef", // fuchsia
    "#ec4899", // pink
];

/// Palette color for a category name
///
/// Sum of the UTF-16 code units of `name`, modulo the palette size. The same
/// name always yields the same color.
pub fn default_color(name: &str) -> &'static str {
    let sum: u64 = name.encode_utf16().map(u64::from).sum();
    CATEGORY_PALETTE[(sum % CATEGORY_PALETTE.len() as u64) as usize]
}

/// Size/extra id from its display name: trimmed, lower-cased, spaces to hyphens
pub fn option_id(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_color_is_code_sum_modulo_palette() {
        // 'A' = 65 -> 65 % 10 = 5
        assert_eq!(default_color("A"), CATEGORY_PALETTE[5]);
        // "Mains" = 77+97+105+110+115 = 504 -> 4
        assert_eq!(default_color("Mains"), CATEGORY_PALETTE[4]);
        // Empty name sums to zero
        assert_eq!(default_color(""), CATEGORY_PALETTE[0]);
    }

    #[test]
    fn test_default_color_is_stable() {
        assert_eq!(default_color("Desserts"), default_color("Desserts"));
        // Case matters, the sum differs
        assert_ne!(default_color("A"), default_color("a"));
    }

    #[test]
    fn test_option_id() {
        assert_eq!(option_id("Large"), "large");
        assert_eq!(option_id("  Extra Cheese "), "extra-cheese");
        assert_eq!(option_id("Double  Patty"), "double--patty");
    }
}
