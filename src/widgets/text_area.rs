use std::cell::Cell;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::layout::Position;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

/// Multi-line text field.
///
/// Up/Down at the first/last line are left unconsumed so an enclosing form can
/// move focus.
pub struct TextArea {
	lines: Vec<String>,
	/// Cursor line
	row: usize,
	/// Cursor position in the line, in graphemes
	col: usize,
	/// Number of visible lines
	rows: u16,
	/// First visible line
	scroll: Cell<usize>,
	placeholder: Option<String>,
}

impl TextArea {
	pub fn new(rows: u16) -> Self {
		Self {
			lines: vec![String::default()],
			row: 0,
			col: 0,
			rows: rows.max(1),
			scroll: Cell::new(0),
			placeholder: None,
		}
	}

	pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = Some(placeholder.into());
		self
	}

	pub fn value(&self) -> String {
		self.lines.join("\n")
	}

	pub fn is_empty(&self) -> bool {
		self.lines.len() == 1 && self.lines[0].is_empty()
	}

	fn line_len(&self, row: usize) -> usize {
		self.lines[row].graphemes(true).count()
	}

	fn byte_index(&self, col: usize) -> usize {
		let line = &self.lines[self.row];
		line.grapheme_indices(true)
			.map(|(i, _)| i)
			.nth(col)
			.unwrap_or(line.len())
	}

	fn enter_char(&mut self, c: char) {
		let index = self.byte_index(self.col);
		self.lines[self.row].insert(index, c);
		// The new char may join its neighbours into one grapheme, so count again
		let end = index + c.len_utf8();
		let col = self.lines[self.row][..end].graphemes(true).count();
		self.col = col.min(self.line_len(self.row));
	}

	fn newline(&mut self) {
		let index = self.byte_index(self.col);
		let rest = self.lines[self.row].split_off(index);
		self.row += 1;
		self.col = 0;
		self.lines.insert(self.row, rest);
	}

	fn backspace(&mut self) {
		if self.col > 0 {
			let start = self.byte_index(self.col - 1);
			let end = self.byte_index(self.col);
			self.lines[self.row].replace_range(start..end, "");
			self.col -= 1;
		} else if self.row > 0 {
			let line = self.lines.remove(self.row);
			self.row -= 1;
			self.col = self.line_len(self.row);
			self.lines[self.row].push_str(&line);
		}
	}

	fn move_left(&mut self) {
		if self.col > 0 {
			self.col -= 1;
		} else if self.row > 0 {
			self.row -= 1;
			self.col = self.line_len(self.row);
		}
	}

	fn move_right(&mut self) {
		if self.col < self.line_len(self.row) {
			self.col += 1;
		} else if self.row + 1 < self.lines.len() {
			self.row += 1;
			self.col = 0;
		}
	}

	fn move_row(&mut self, offset: isize) -> bool {
		let Some(row) = self.row.checked_add_signed(offset) else {
			return false;
		};
		if row >= self.lines.len() {
			return false;
		}
		self.row = row;
		self.col = self.col.min(self.line_len(row));
		true
	}

	fn ensure_visible(&self) {
		let scroll = self.scroll.get();
		let rows = self.rows as usize;
		if self.row < scroll {
			self.scroll.set(self.row);
		} else if self.row >= scroll + rows {
			self.scroll.set(self.row + 1 - rows);
		}
	}
}

impl Component for TextArea {
	fn input(&mut self, key: &KeyEvent) -> bool {
		let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
		let alt_pressed = key.modifiers.contains(KeyModifiers::ALT);
		match key.code {
			KeyCode::Enter if !ctrl_pressed => self.newline(),
			KeyCode::Backspace => self.backspace(),
			KeyCode::Left => self.move_left(),
			KeyCode::Right => self.move_right(),
			KeyCode::Up => return self.move_row(-1),
			KeyCode::Down => return self.move_row(1),
			KeyCode::Home => self.col = 0,
			KeyCode::Char('a') if ctrl_pressed => self.col = 0,
			KeyCode::End => self.col = self.line_len(self.row),
			KeyCode::Char('e') if ctrl_pressed => self.col = self.line_len(self.row),
			KeyCode::Char(c) if !ctrl_pressed && !alt_pressed => self.enter_char(c),
			_ => return false,
		}
		true
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		self.ensure_visible();
		let scroll = self.scroll.get();

		let text = if self.is_empty() {
			let placeholder = self.placeholder.clone().unwrap_or_default();
			Text::from(Line::styled(placeholder, Style::default().fg(Color::DarkGray)))
		} else {
			self.lines
				.iter()
				.skip(scroll)
				.take(self.rows as usize)
				.map(|l| Line::raw(l.as_str()))
				.collect::<Text>()
		};
		frame.render_widget(Paragraph::new(text), ctx.area);

		if ctx.selected {
			let line = &self.lines[self.row];
			let prefix = line.graphemes(true).take(self.col).collect::<String>();
			let x = (prefix.width() as u16).min(ctx.area.width.saturating_sub(1));
			ctx.cursor = Some(Position::new(
				ctx.area.x + x,
				ctx.area.y + (self.row - scroll) as u16,
			));
		}
	}

	fn height(&self) -> u16 {
		self.rows
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn type_str(area: &mut TextArea, text: &str) {
		for c in text.chars() {
			let code = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
			area.input(&key(code));
		}
	}

	#[test]
	fn newlines_split_and_join() {
		let mut area = TextArea::new(3);
		type_str(&mut area, "buy\nmilk");
		assert_eq!(area.value(), "buy\nmilk");

		for _ in 0..4 {
			area.input(&key(KeyCode::Left));
		}
		area.input(&key(KeyCode::Backspace));
		assert_eq!(area.value(), "buymilk");
		area.input(&key(KeyCode::Enter));
		assert_eq!(area.value(), "buy\nmilk");
	}

	#[test]
	fn vertical_edges_are_not_consumed() {
		let mut area = TextArea::new(3);
		type_str(&mut area, "a\nbc");
		assert!(!area.input(&key(KeyCode::Down)));
		assert!(area.input(&key(KeyCode::Up)));
		assert!(!area.input(&key(KeyCode::Up)));
	}

	#[test]
	fn ctrl_enter_is_left_for_the_form() {
		let mut area = TextArea::new(3);
		type_str(&mut area, "x");
		assert!(!area.input(&KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL)));
		assert_eq!(area.value(), "x");
	}

	#[test]
	fn joiner_merging_two_graphemes() {
		let mut area = TextArea::new(3);
		type_str(&mut area, "a\n👨👩");
		area.input(&key(KeyCode::Left));
		area.input(&key(KeyCode::Char('\u{200D}')));
		assert_eq!(area.value(), "a\n👨\u{200D}👩");
		assert!(area.col <= area.line_len(1));
		area.input(&key(KeyCode::Char('x')));
		assert_eq!(area.value(), "a\n👨\u{200D}👩x");
	}

	#[test]
	fn starts_empty() {
		let area = TextArea::new(2).placeholder("Take a note...");
		assert!(area.is_empty());
		assert_eq!(area.value(), "");
		assert_eq!(area.height(), 2);
	}
}
