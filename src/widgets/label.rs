use std::sync::LazyLock;

use crossterm::event::KeyEvent;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

/// Label drawn as the title of a block around the wrapped widget
#[derive(Debug, Clone)]
pub struct LabelStyle<'s> {
	pub block: Block<'s>,
	pub style: Option<Style>,
	pub style_selected: Option<Style>,
}

impl Default for LabelStyle<'_> {
	fn default() -> Self {
		Self {
			block: Block::bordered(),
			style: None,
			style_selected: None,
		}
	}
}

impl LabelStyle<'_> {
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

static DEFAULT_STYLE: LazyLock<LabelStyle> = LazyLock::new(LabelStyle::default);

/// Wraps a component with a label
pub struct Labeled<'s, T>
where
	T: Component,
{
	label: Span<'s>,
	style: &'s LabelStyle<'s>,
	pub inner: T,
}

impl<'s, T> Labeled<'s, T>
where
	T: Component,
{
	pub fn new(label: Span<'s>, inner: T) -> Self {
		Self {
			label,
			style: &DEFAULT_STYLE,
			inner,
		}
	}

	pub fn style(mut self, style: &'s LabelStyle<'s>) -> Self {
		self.style = style;
		self
	}
}

impl<T> Component for Labeled<'_, T>
where
	T: Component,
{
	fn input(&mut self, key: &KeyEvent) -> bool {
		self.inner.input(key)
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		let style = if ctx.selected {
			self.style.style_selected()
		} else {
			self.style.style()
		};
		let outer = ctx.area;
		let block = self.style.block.clone().title(self.label.clone()).style(style);
		ctx.area = block.inner(outer);
		frame.render_widget(block, outer);
		self.inner.render(frame, ctx);
		ctx.area = outer;
	}

	fn height(&self) -> u16 {
		// Block borders above and below
		self.inner.height() + 2
	}
}

#[cfg(test)]
mod tests {
	use ratatui::backend::TestBackend;
	use ratatui::Terminal;

	use super::*;
	use crate::widgets::text_input::TextInput;

	#[test]
	fn wraps_inner_widget_in_titled_block() {
		let labeled = Labeled::new("Title".into(), TextInput::new().with_input("Milk".into()));
		assert_eq!(labeled.height(), 3);

		let mut terminal = Terminal::new(TestBackend::new(20, 3)).unwrap();
		terminal
			.draw(|frame| {
				let mut ctx = ComponentRenderCtx::new(frame.area());
				labeled.render(frame, &mut ctx);
				assert_eq!(ctx.area, frame.area());
			})
			.unwrap();
		let rows = terminal
			.backend()
			.buffer()
			.content()
			.chunks(20)
			.map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
			.collect::<Vec<_>>();
		assert!(rows[0].contains("Title"));
		assert!(rows[1].contains("Milk"));
	}
}
