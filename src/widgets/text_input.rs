use std::sync::LazyLock;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::layout::Position;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Styled;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

#[derive(Debug, Clone)]
pub struct TextInputStyle<'s> {
	/// |<padding0><marker0>Input<marker1><padding1>|
	pub padding: [u16; 2],
	pub markers: [Span<'s>; 2],
	/// Shown while the input is empty
	pub placeholder: Option<Span<'s>>,
	/// Style override
	pub style: Option<Style>,
	/// Selected style override
	pub style_selected: Option<Style>,
}

impl Default for TextInputStyle<'_> {
	fn default() -> Self {
		Self {
			padding: Default::default(),
			markers: ["[".into(), "]".into()],
			placeholder: None,
			style: Default::default(),
			style_selected: Default::default(),
		}
	}
}

impl TextInputStyle<'_> {
	pub fn style(&self) -> Style {
		self.style.unwrap_or_default()
	}

	pub fn style_selected(&self) -> Style {
		match self.style_selected {
			Some(style) => style,
			None => Style::default().fg(Color::Yellow),
		}
	}
}

static DEFAULT_STYLE: LazyLock<TextInputStyle> = LazyLock::new(TextInputStyle::default);

/// Single line text field
pub struct TextInput<'s> {
	input: String,
	/// Cursor position, in graphemes
	cursor: usize,

	style: &'s TextInputStyle<'s>,
}

impl<'s> TextInput<'s> {
	pub fn new() -> Self {
		Self {
			input: String::default(),
			cursor: 0,
			style: &DEFAULT_STYLE,
		}
	}

	pub fn style(mut self, style: &'s TextInputStyle<'s>) -> Self {
		self.style = style;
		self
	}

	pub fn with_input(mut self, input: String) -> Self {
		self.set_input(input);
		self
	}

	pub fn set_input(&mut self, input: String) {
		self.cursor = input.graphemes(true).count();
		self.input = input;
	}

	pub fn get_input(&self) -> &str {
		&self.input
	}

	pub fn submit(&mut self) -> String {
		self.cursor = 0;
		std::mem::take(&mut self.input)
	}

	fn grapheme_count(&self) -> usize {
		self.input.graphemes(true).count()
	}

	/// Byte index of the grapheme at `index`
	fn byte_index(&self, index: usize) -> usize {
		self.input
			.grapheme_indices(true)
			.map(|(i, _)| i)
			.nth(index)
			.unwrap_or(self.input.len())
	}

	fn enter_char(&mut self, c: char) {
		let index = self.byte_index(self.cursor);
		self.input.insert(index, c);
		// The new char may join its neighbours into one grapheme, so count again
		let end = index + c.len_utf8();
		self.cursor = self.input[..end]
			.graphemes(true)
			.count()
			.min(self.grapheme_count());
	}

	fn delete_before(&mut self) {
		if self.cursor == 0 {
			return;
		}
		let start = self.byte_index(self.cursor - 1);
		let end = self.byte_index(self.cursor);
		self.input.replace_range(start..end, "");
		self.cursor -= 1;
	}

	fn delete_at(&mut self) {
		if self.cursor >= self.grapheme_count() {
			return;
		}
		let start = self.byte_index(self.cursor);
		let end = self.byte_index(self.cursor + 1);
		self.input.replace_range(start..end, "");
	}

	fn kill_to_start(&mut self) {
		let end = self.byte_index(self.cursor);
		self.input.replace_range(..end, "");
		self.cursor = 0;
	}

	fn move_cursor(&mut self, offset: isize) {
		self.cursor = self
			.cursor
			.saturating_add_signed(offset)
			.min(self.grapheme_count());
	}
}

impl Default for TextInput<'_> {
	fn default() -> Self {
		Self::new()
	}
}

impl Component for TextInput<'_> {
	fn input(&mut self, key: &KeyEvent) -> bool {
		let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
		let alt_pressed = key.modifiers.contains(KeyModifiers::ALT);
		match key.code {
			KeyCode::Backspace => self.delete_before(),
			KeyCode::Delete => self.delete_at(),
			KeyCode::Char('d') if ctrl_pressed => self.delete_at(),
			KeyCode::Char('u') if ctrl_pressed => self.kill_to_start(),
			// Movement
			KeyCode::Left => self.move_cursor(-1),
			KeyCode::Char('b') if ctrl_pressed => self.move_cursor(-1),
			KeyCode::Right => self.move_cursor(1),
			KeyCode::Char('f') if ctrl_pressed => self.move_cursor(1),
			KeyCode::Home => self.cursor = 0,
			KeyCode::Char('a') if ctrl_pressed => self.cursor = 0,
			KeyCode::End => self.cursor = self.grapheme_count(),
			KeyCode::Char('e') if ctrl_pressed => self.cursor = self.grapheme_count(),
			KeyCode::Char(c) if !ctrl_pressed && !alt_pressed => self.enter_char(c),
			_ => return false,
		}
		true
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		let style = if ctx.selected {
			self.style.style_selected()
		} else {
			self.style.style()
		};
		let markers_width = self.style.markers[0].width() + self.style.markers[1].width();
		let text_width = (ctx.area.width as usize)
			.saturating_sub(self.style.padding[0] as usize + self.style.padding[1] as usize)
			.saturating_sub(markers_width)
			.max(1);

		// Scroll horizontally so the cursor stays visible
		let graphemes = self.input.graphemes(true).collect::<Vec<_>>();
		let mut start = 0;
		let mut cursor_x = graphemes[..self.cursor].concat().width();
		while cursor_x >= text_width && start < self.cursor {
			cursor_x -= graphemes[start].width();
			start += 1;
		}
		let mut visible = String::default();
		for g in &graphemes[start..] {
			if visible.width() + g.width() > text_width {
				break;
			}
			visible.push_str(g);
		}

		let text = if self.input.is_empty() {
			match &self.style.placeholder {
				Some(placeholder) => placeholder.clone(),
				None => Span::raw(""),
			}
		} else {
			Span::raw(visible)
		};
		let spacer = " ".repeat(text_width.saturating_sub(text.width()));
		let line = Line::from(vec![
			Span::raw(" ".repeat(self.style.padding[0] as usize)),
			self.style.markers[0].clone(),
			text,
			Span::raw(spacer),
			self.style.markers[1].clone(),
			Span::raw(" ".repeat(self.style.padding[1] as usize)),
		])
		.set_style(style);
		frame.render_widget(line, ctx.area);

		if ctx.selected {
			ctx.cursor = Some(Position::new(
				ctx.area.x
					+ self.style.padding[0]
					+ self.style.markers[0].width() as u16
					+ cursor_x as u16,
				ctx.area.y,
			));
		}
	}

	fn height(&self) -> u16 {
		1
	}
}
