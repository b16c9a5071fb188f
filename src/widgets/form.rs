use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::ScrollbarState;
use ratatui::Frame;

use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSignal {
	Exit,
	Return,
}

pub struct FormStyle {
	pub bg: Color,
}

/// A vertical stack of focusable components
pub trait Form {
	fn component_count(&self) -> usize;
	fn component(&self, index: usize) -> Option<&dyn Component>;
	fn component_mut(&mut self, index: usize) -> Option<&mut dyn Component>;

	fn selected(&self) -> Option<usize>;
	fn set_selected(&mut self, selected: Option<usize>);

	fn get_style(&self) -> &FormStyle;

	fn scroll(&self) -> u16;
	fn set_scroll(&self, scroll: u16);

	/// Keys neither the focused component nor focus movement consumed
	fn unhandled(&mut self, key: &KeyEvent) -> Option<FormSignal>;

	fn render_form(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx);
}

pub trait FormExt: Form {
	fn components(&self) -> impl Iterator<Item = &dyn Component> {
		(0..self.component_count()).filter_map(move |i| self.component(i))
	}

	/// Scrolls so the focused component fits in `viewport_height`
	fn ensure_visible(&self, viewport_height: u16) {
		let Some(selected) = self.selected() else {
			return;
		};

		let y: u16 = self.components().take(selected).map(|c| c.height()).sum();
		let h = self.component(selected).map_or(0, |c| c.height());
		let scroll = self.scroll();

		if y < scroll {
			self.set_scroll(y);
		} else if y + h > scroll + viewport_height {
			self.set_scroll(y + h - viewport_height);
		}
	}

	fn focus_next(&mut self) {
		match (self.selected(), self.component_count()) {
			(_, 0) => self.set_selected(None),
			(None, _) => self.set_selected(Some(0)),
			(Some(x), count) => self.set_selected(Some((x + 1).min(count - 1))),
		}
	}

	fn focus_prev(&mut self) {
		match (self.selected(), self.component_count()) {
			(_, 0) => self.set_selected(None),
			(None, _) => self.set_selected(None),
			(Some(x), _) => self.set_selected(Some(x.saturating_sub(1))),
		}
	}

	fn input_form(&mut self, key: &KeyEvent) -> Option<FormSignal> {
		if let Some(selected) = self.selected() {
			if self
				.component_mut(selected)
				.is_some_and(|component| component.input(key))
			{
				return None;
			}
		}

		match key.code {
			KeyCode::Tab | KeyCode::Down => self.focus_next(),
			KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
			_ => return self.unhandled(key),
		}
		None
	}

	/// Render the form body
	fn render_body(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		let inner_area = Rect {
			width: ctx.area.width.saturating_sub(2), // -2 for scrollbar
			..ctx.area
		};

		// Fill with default color
		let bg = Style::default().bg(self.get_style().bg);
		frame.buffer_mut().set_style(ctx.area, bg);

		self.ensure_visible(inner_area.height);

		let mut y = 0u16;
		for (idx, component) in self.components().enumerate() {
			let h = component.height();
			let top = y as i32 - self.scroll() as i32;
			y += h;

			// Only render if fully visible
			if top < 0 || top as u16 + h > inner_area.height {
				continue;
			}
			let mut child = ComponentRenderCtx {
				area: Rect {
					x: inner_area.x,
					y: inner_area.y + top as u16,
					width: inner_area.width,
					height: h,
				},
				selected: Some(idx) == self.selected(),
				cursor: None,
			};
			component.render(frame, &mut child);
			if child.cursor.is_some() {
				ctx.cursor = child.cursor;
			}
		}

		if y > inner_area.height {
			let max_scroll = y - inner_area.height;
			let mut scroll_state =
				ScrollbarState::new(max_scroll as usize).position(self.scroll().min(max_scroll) as usize);
			let scrollbar_area = Rect {
				x: ctx.area.x + ctx.area.width.saturating_sub(1),
				width: 1,
				..ctx.area
			};
			frame.render_stateful_widget(
				Scrollbar::new(ScrollbarOrientation::VerticalRight),
				scrollbar_area,
				&mut scroll_state,
			);
		}
	}
}

impl<T: Form + ?Sized> FormExt for T {}
