use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::Frame;

use crate::data::palette;
use crate::data::palette::PALETTE;
use crate::style::note_color;
use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

/// Row of palette colors, one of which is selected
pub struct Swatches {
	selected: usize,
}

impl Swatches {
	pub fn new(color: &str) -> Self {
		Self {
			selected: palette::position(color).unwrap_or(0),
		}
	}

	pub fn color(&self) -> &'static str {
		PALETTE[self.selected]
	}

	pub fn cycle(&mut self, offset: isize) {
		self.selected = palette::position(palette::cycle(self.color(), offset)).unwrap_or(0);
	}

	/// Swatches as spans, usable outside of a form
	pub fn line(color: &str, selected: bool) -> Line<'static> {
		let current = palette::position(color);
		let mut spans = vec![];
		for (i, c) in PALETTE.iter().enumerate() {
			let style = Style::default().bg(note_color(c)).fg(Color::Black);
			if Some(i) == current {
				spans.push(Span::styled(" ● ", style.bold()));
			} else {
				spans.push(Span::styled("   ", style));
			}
			spans.push(" ".into());
		}
		if selected {
			spans.push(Span::styled("◀ ▶", Style::default().fg(Color::Yellow)));
		}
		Line::from(spans)
	}
}

impl Component for Swatches {
	fn input(&mut self, key: &KeyEvent) -> bool {
		match key.code {
			KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('[') => self.cycle(-1),
			KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(']') => self.cycle(1),
			_ => return false,
		}
		true
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		frame.render_widget(Self::line(self.color(), ctx.selected), ctx.area);
	}

	fn height(&self) -> u16 {
		1
	}
}

#[cfg(test)]
mod tests {
	use crossterm::event::KeyModifiers;

	use super::*;

	#[test]
	fn arrows_cycle_the_palette() {
		let mut swatches = Swatches::new("#d7aefb");
		assert!(swatches.input(&KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)));
		assert_eq!(swatches.color(), "#fff");
		assert!(swatches.input(&KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)));
		assert_eq!(swatches.color(), "#d7aefb");
		assert!(!swatches.input(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
	}

	#[test]
	fn unknown_color_selects_first() {
		assert_eq!(Swatches::new("tomato").color(), PALETTE[0]);
	}
}
