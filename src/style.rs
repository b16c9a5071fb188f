use std::str::FromStr;

use ratatui::style::Color;

use crate::data::palette::DEFAULT_COLOR;

pub const HELP_LINE_BG: Color = Color::from_u32(0x1a60b5);
pub const BOARD_BG: Color = Color::from_u32(0x241f31);
pub const SECTION_BORDER: Color = Color::from_u32(0x5d507f);
pub const EMPTY_FG: Color = Color::from_u32(0x7f7faf);
/// Background for the composer popup
pub const COMPOSER_BG: Color = Color::from_u32(0x2f2f2f);
/// Text on note cards, which are always drawn on light pastel backgrounds
pub const CARD_FG: Color = Color::from_u32(0x202124);

/// Parses `#rgb`, `#rrggbb` or a named color
pub fn parse_color(color: &str) -> Option<Color> {
	let color = color.trim();
	if let Some(hex) = color.strip_prefix('#') {
		if hex.len() == 3 && hex.is_ascii() {
			let mut rgb = [0u8; 3];
			for (i, digit) in hex.chars().enumerate() {
				let v = digit.to_digit(16)? as u8;
				rgb[i] = v * 16 + v;
			}
			return Some(Color::Rgb(rgb[0], rgb[1], rgb[2]));
		}
	}
	Color::from_str(color).ok()
}

/// Background of a note card, falling back to the default palette entry
pub fn note_color(color: &str) -> Color {
	parse_color(color)
		.or_else(|| parse_color(DEFAULT_COLOR))
		.unwrap_or(Color::White)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_palette_and_names() {
		assert_eq!(parse_color("#fff"), Some(Color::Rgb(255, 255, 255)));
		assert_eq!(parse_color("#f28b82"), Some(Color::Rgb(0xf2, 0x8b, 0x82)));
		assert_eq!(parse_color("red"), Some(Color::Red));
		assert_eq!(parse_color("#ggg"), None);
	}

	#[test]
	fn unknown_colors_fall_back() {
		assert_eq!(note_color("not a color"), Color::Rgb(255, 255, 255));
	}
}
