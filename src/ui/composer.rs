use std::cell::Cell;
use std::sync::LazyLock;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::symbols::border::QUADRANT_OUTSIDE;
use ratatui::widgets::Block;
use ratatui::widgets::Clear;
use ratatui::Frame;

use crate::style::COMPOSER_BG;
use crate::widgets::form::Form;
use crate::widgets::form::FormExt;
use crate::widgets::form::FormSignal;
use crate::widgets::form::FormStyle;
use crate::widgets::label::LabelStyle;
use crate::widgets::label::Labeled;
use crate::widgets::swatches::Swatches;
use crate::widgets::text_area::TextArea;
use crate::widgets::text_input::TextInput;
use crate::widgets::text_input::TextInputStyle;
use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

static LABEL_STYLE: LazyLock<LabelStyle> = LazyLock::new(|| LabelStyle {
	block: Block::bordered(),
	style: Some(Style::default().fg(Color::White)),
	style_selected: Some(Style::default().fg(Color::Cyan)),
});
static TEXTINPUT_STYLE: LazyLock<TextInputStyle> = LazyLock::new(|| TextInputStyle {
	padding: [0, 0],
	markers: ["".into(), "".into()],
	placeholder: Some("Title".fg(Color::DarkGray)),
	style: Some(Style::default().fg(Color::White)),
	style_selected: Some(Style::default().fg(Color::White)),
});

const TITLE: usize = 0;
const CONTENT: usize = 1;
const PALETTE: usize = 2;

/// Popup form for writing a new note
pub struct Composer {
	style: FormStyle,
	title: Labeled<'static, TextInput<'static>>,
	content: Labeled<'static, TextArea>,
	palette: Labeled<'static, Swatches>,
	selected: Option<usize>,
	scroll: Cell<u16>,
}

impl Composer {
	pub fn new(color: &str) -> Self {
		Self {
			style: FormStyle { bg: COMPOSER_BG },
			title: Labeled::new("Title".into(), TextInput::new().style(&TEXTINPUT_STYLE))
				.style(&LABEL_STYLE),
			content: Labeled::new(
				"Note".into(),
				TextArea::new(6).placeholder("Take a note..."),
			)
			.style(&LABEL_STYLE),
			palette: Labeled::new("Color".into(), Swatches::new(color)).style(&LABEL_STYLE),
			selected: Some(TITLE),
			scroll: Cell::new(0),
		}
	}

	pub fn title(&self) -> &str {
		self.title.inner.get_input()
	}

	pub fn content(&self) -> String {
		self.content.inner.value()
	}

	pub fn color(&self) -> &'static str {
		self.palette.inner.color()
	}
}

impl Form for Composer {
	fn component_count(&self) -> usize {
		3
	}

	fn component(&self, index: usize) -> Option<&dyn Component> {
		match index {
			TITLE => Some(&self.title),
			CONTENT => Some(&self.content),
			PALETTE => Some(&self.palette),
			_ => None,
		}
	}

	fn component_mut(&mut self, index: usize) -> Option<&mut dyn Component> {
		match index {
			TITLE => Some(&mut self.title),
			CONTENT => Some(&mut self.content),
			PALETTE => Some(&mut self.palette),
			_ => None,
		}
	}

	fn selected(&self) -> Option<usize> {
		self.selected
	}

	fn set_selected(&mut self, selected: Option<usize>) {
		self.selected = selected;
	}

	fn get_style(&self) -> &FormStyle {
		&self.style
	}

	fn scroll(&self) -> u16 {
		self.scroll.get()
	}

	fn set_scroll(&self, scroll: u16) {
		self.scroll.set(scroll);
	}

	fn unhandled(&mut self, key: &KeyEvent) -> Option<FormSignal> {
		let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Char('s') if ctrl_pressed => Some(FormSignal::Return),
			KeyCode::Enter if ctrl_pressed => Some(FormSignal::Return),
			// Enter in the title moves on to the note body
			KeyCode::Enter if self.selected == Some(TITLE) => {
				self.focus_next();
				None
			}
			KeyCode::Esc => Some(FormSignal::Exit),
			_ => None,
		}
	}

	fn render_form(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		let border = Block::bordered()
			.border_set(QUADRANT_OUTSIDE)
			.title(" New note ")
			.title_style(Style::default().fg(Color::White))
			.title_bottom(" ctrl-s (save)  tab (next)  esc (cancel) ")
			.title_alignment(ratatui::layout::HorizontalAlignment::Center)
			.bg(self.style.bg)
			.fg(Color::from_u32(0x1a1a1f));
		frame.render_widget(Clear, ctx.area);
		let outer = ctx.area;
		ctx.area = border.inner(outer);
		frame.render_widget(border, outer);
		self.render_body(frame, ctx);
		ctx.area = outer;
	}
}

impl Component for Composer {
	fn input(&mut self, key: &KeyEvent) -> bool {
		self.input_form(key).is_none()
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		self.render_form(frame, ctx);
	}

	fn height(&self) -> u16 {
		// Components plus the popup border
		self.components().map(|c| c.height()).sum::<u16>() + 2
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn type_str(composer: &mut Composer, text: &str) {
		for c in text.chars() {
			assert_eq!(composer.input_form(&key(KeyCode::Char(c))), None);
		}
	}

	#[test]
	fn fields_follow_focus() {
		let mut composer = Composer::new("#fff");
		type_str(&mut composer, "Milk");
		composer.input_form(&key(KeyCode::Enter));
		assert_eq!(composer.selected(), Some(CONTENT));
		type_str(&mut composer, "buy");
		composer.input_form(&key(KeyCode::Enter));
		type_str(&mut composer, "now");
		composer.input_form(&key(KeyCode::Tab));
		assert_eq!(composer.selected(), Some(PALETTE));
		composer.input_form(&key(KeyCode::Right));

		assert_eq!(composer.title(), "Milk");
		assert_eq!(composer.content(), "buy\nnow");
		assert_eq!(composer.color(), "#f28b82");
	}

	#[test]
	fn signals() {
		let mut composer = Composer::new("#fff");
		assert_eq!(
			composer.input_form(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
			Some(FormSignal::Return)
		);
		composer.input_form(&key(KeyCode::Tab));
		assert_eq!(
			composer.input_form(&KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL)),
			Some(FormSignal::Return)
		);
		assert_eq!(composer.input_form(&key(KeyCode::Esc)), Some(FormSignal::Exit));
	}
}
