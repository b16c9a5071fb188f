/// Colors offered by the palette, in display order
pub const PALETTE: [&str; 9] = [
	"#fff", "#f28b82", "#fbbc04", "#fff475", "#ccff90", "#a7ffeb", "#cbf0f8", "#aecbfa", "#d7aefb",
];

/// Color selected when the board starts
pub const DEFAULT_COLOR: &str = PALETTE[0];

/// Position of `color` in the palette, if it is a palette entry
pub fn position(color: &str) -> Option<usize> {
	PALETTE.iter().position(|c| c.eq_ignore_ascii_case(color))
}

/// Palette entry `offset` steps away from `color`, wrapping around.
///
/// Free-form colors start from the first entry.
pub fn cycle(color: &str, offset: isize) -> &'static str {
	let len = PALETTE.len() as isize;
	let current = position(color).unwrap_or(0) as isize;
	PALETTE[(current + offset).rem_euclid(len) as usize]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cycle_wraps_both_ways() {
		assert_eq!(cycle("#fff", -1), "#d7aefb");
		assert_eq!(cycle("#d7aefb", 1), "#fff");
		assert_eq!(cycle("#F28B82", 2), "#fff475");
	}

	#[test]
	fn free_form_colors_start_at_first_entry() {
		assert_eq!(position("tomato"), None);
		assert_eq!(cycle("tomato", 1), "#f28b82");
	}
}
