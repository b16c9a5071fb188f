use std::cell::RefCell;
use std::sync::LazyLock;

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::layout::Constraint;
use ratatui::layout::Flex;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Clear;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::data::note::Note;
use crate::data::palette;
use crate::data::repository::NoteRepository;
use crate::style::note_color;
use crate::style::BOARD_BG;
use crate::style::CARD_FG;
use crate::style::EMPTY_FG;
use crate::style::HELP_LINE_BG;
use crate::style::SECTION_BORDER;
use crate::ui::composer::Composer;
use crate::widgets::form::FormExt;
use crate::widgets::form::FormSignal;
use crate::widgets::label::LabelStyle;
use crate::widgets::label::Labeled;
use crate::widgets::swatches::Swatches;
use crate::widgets::text_input::TextInput;
use crate::widgets::text_input::TextInputStyle;
use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

/// Content lines shown on a card before it is cut off
const CARD_CONTENT_LINES: usize = 3;

#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActiveWidget {
	Search,
	#[default]
	Notes,
}

static SEARCH_LABEL_STYLE: LazyLock<LabelStyle> = LazyLock::new(|| LabelStyle {
	block: Block::bordered().border_type(BorderType::Thick),
	style: Some(Style::default().fg(Color::DarkGray).bg(BOARD_BG)),
	style_selected: Some(Style::default().fg(Color::Cyan).bg(BOARD_BG)),
});
static SEARCH_INPUT_STYLE: LazyLock<TextInputStyle> = LazyLock::new(|| TextInputStyle {
	padding: [0, 0],
	markers: ["".into(), "".into()],
	placeholder: Some("Search notes".fg(Color::DarkGray)),
	style: Some(Style::default().fg(Color::White).bg(BOARD_BG)),
	style_selected: Some(Style::default().fg(Color::White).bg(BOARD_BG)),
});

/// Main screen: search box, palette, and the pinned and unpinned notes
pub struct Board {
	repo: NoteRepository,
	active: ActiveWidget,

	search: Labeled<'static, TextInput<'static>>,

	/// Visible note ids, per section
	pinned: Vec<String>,
	others: Vec<String>,
	/// Index into pinned followed by others
	selected: usize,

	pinned_state: RefCell<ListState>,
	others_state: RefCell<ListState>,

	composer: Option<Composer>,
}

impl Board {
	pub fn new(repo: NoteRepository) -> Self {
		let search = TextInput::new().style(&SEARCH_INPUT_STYLE).with_input(repo.query().into());
		let mut board = Self {
			repo,
			active: Default::default(),
			search: Labeled::new("Search".into(), search).style(&SEARCH_LABEL_STYLE),
			pinned: vec![],
			others: vec![],
			selected: 0,
			pinned_state: RefCell::default(),
			others_state: RefCell::default(),
			composer: None,
		};
		board.refresh(None);
		board
	}

	pub fn repository(&self) -> &NoteRepository {
		&self.repo
	}

	pub fn active(&self) -> ActiveWidget {
		self.active
	}

	pub fn is_composing(&self) -> bool {
		self.composer.is_some()
	}

	/// Id of the highlighted note
	pub fn selected_id(&self) -> Option<&str> {
		self.pinned
			.iter()
			.chain(&self.others)
			.nth(self.selected)
			.map(String::as_str)
	}

	fn visible_len(&self) -> usize {
		self.pinned.len() + self.others.len()
	}

	/// Recomputes the visible notes, keeping `keep` highlighted if it is still
	/// visible
	fn refresh(&mut self, keep: Option<&str>) {
		let view = self.repo.view();
		self.pinned = view.pinned.iter().map(|n| n.id.clone()).collect();
		self.others = view.others.iter().map(|n| n.id.clone()).collect();

		let position = keep.and_then(|id| {
			self.pinned
				.iter()
				.chain(&self.others)
				.position(|visible| visible == id)
		});
		self.selected = match position {
			Some(position) => position,
			None => self.selected.min(self.visible_len().saturating_sub(1)),
		};
	}

	fn move_cursor(&mut self, offset: isize) {
		self.selected = self
			.selected
			.saturating_add_signed(offset)
			.min(self.visible_len().saturating_sub(1));
	}

	fn with_selected(&mut self, action: impl FnOnce(&mut NoteRepository, &str) -> Option<String>) {
		let Some(id) = self.selected_id().map(String::from) else {
			return;
		};
		let keep = action(&mut self.repo, &id);
		self.refresh(keep.as_deref());
	}

	fn input_composer(&mut self, key: &KeyEvent) {
		let Some(composer) = &mut self.composer else {
			return;
		};
		let signal = composer.input_form(key);
		let color = composer.color();
		self.repo.set_selected_color(color);

		match signal {
			Some(FormSignal::Return) => {
				let added = self
					.repo
					.add(composer.title(), &composer.content(), color)
					.map(|n| n.id.clone());
				if let Some(id) = added {
					self.composer = None;
					self.refresh(Some(&id));
				}
			}
			Some(FormSignal::Exit) => self.composer = None,
			None => {}
		}
	}

	fn input_search(&mut self, key: &KeyEvent) -> bool {
		if self.search.input(key) {
			self.repo.set_query(self.search.inner.get_input());
			let keep = self.selected_id().map(String::from);
			self.refresh(keep.as_deref());
			return true;
		}
		let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Down | KeyCode::Tab | KeyCode::Esc | KeyCode::Enter => {
				self.active = ActiveWidget::Notes
			}
			KeyCode::Char('n') if ctrl_pressed => self.active = ActiveWidget::Notes,
			_ => return false,
		}
		true
	}

	fn format_card(note: &Note, width: u16) -> ListItem<'_> {
		let bg = note_color(&note.color);
		let style = Style::default().fg(CARD_FG).bg(bg);
		let pad = |line: Line<'static>| {
			let fill = (width as usize).saturating_sub(line.width());
			let mut line = line;
			line.push_span(Span::raw(" ".repeat(fill)));
			line
		};

		let mut lines = vec![];
		let pin = if note.pinned { "◆ " } else { "◇ " };
		lines.push(pad(Line::from(vec![
			Span::raw(pin),
			Span::styled(note.display_title().to_string(), Style::default().bold()),
		])));
		let mut content = note.content.lines();
		for line in content.by_ref().take(CARD_CONTENT_LINES) {
			lines.push(pad(Line::raw(line.to_string())));
		}
		if content.next().is_some() {
			lines.push(pad(Line::raw("…")));
		}
		lines.push(pad(Line::raw("")));

		ListItem::new(Text::from(lines)).style(style)
	}

	fn render_section(
		&self,
		frame: &mut Frame,
		area: Rect,
		title: &str,
		ids: &[String],
		empty: &str,
		state: &RefCell<ListState>,
		selected: Option<usize>,
	) {
		let block = Block::bordered()
			.title(format!(" {title} ({}) ", ids.len()))
			.border_style(Style::default().fg(SECTION_BORDER))
			.bg(BOARD_BG);
		let inner = block.inner(area);
		frame.render_widget(block, area);

		if ids.is_empty() {
			let message = Paragraph::new(empty)
				.style(Style::default().fg(EMPTY_FG).italic())
				.centered();
			let [line] = Layout::vertical([Constraint::Length(1)])
				.flex(Flex::Center)
				.areas(inner);
			frame.render_widget(message, line);
			return;
		}

		let width = inner.width.saturating_sub(2);
		let items = ids
			.iter()
			.filter_map(|id| self.repo.get(id))
			.map(|note| Self::format_card(note, width))
			.collect::<Vec<_>>();
		let list = List::new(items)
			.highlight_symbol("▌ ")
			.repeat_highlight_symbol(true)
			.highlight_style(Style::default().add_modifier(Modifier::BOLD));

		let mut state = state.borrow_mut();
		state.select(selected);
		frame.render_stateful_widget(list, inner, &mut *state);
	}
}

impl Component for Board {
	fn input(&mut self, key: &KeyEvent) -> bool {
		if self.composer.is_some() {
			self.input_composer(key);
			return true;
		}
		if self.active == ActiveWidget::Search {
			return self.input_search(key);
		}

		let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
		match key.code {
			KeyCode::Char('/') => self.active = ActiveWidget::Search,
			KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.move_cursor(1),
			KeyCode::Char('n') if ctrl_pressed => self.move_cursor(1),
			KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => self.move_cursor(-1),
			KeyCode::Char('p') if ctrl_pressed => self.move_cursor(-1),
			KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
			KeyCode::End | KeyCode::Char('G') => self.move_cursor(isize::MAX),
			KeyCode::Char('n') => self.composer = Some(Composer::new(self.repo.selected_color())),
			KeyCode::Char('p') => self.with_selected(|repo, id| {
				repo.toggle_pin(id);
				Some(id.into())
			}),
			KeyCode::Char('a') => self.with_selected(|repo, id| {
				repo.archive(id);
				None
			}),
			KeyCode::Char('d') => self.with_selected(|repo, id| repo.duplicate(id).map(|n| n.id.clone())),
			KeyCode::Char('x') | KeyCode::Delete => self.with_selected(|repo, id| {
				repo.delete(id);
				None
			}),
			KeyCode::Char('[') => {
				let color = palette::cycle(self.repo.selected_color(), -1);
				self.repo.set_selected_color(color);
			}
			KeyCode::Char(']') => {
				let color = palette::cycle(self.repo.selected_color(), 1);
				self.repo.set_selected_color(color);
			}
			KeyCode::Esc if !self.repo.query().is_empty() => {
				self.search.inner.submit();
				self.repo.set_query("");
				let keep = self.selected_id().map(String::from);
				self.refresh(keep.as_deref());
			}
			_ => return false,
		}
		true
	}

	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx) {
		let area = ctx.area;
		frame.render_widget(Clear, area);

		let [help_area, search_area, palette_area, body] = Layout::vertical([
			Constraint::Length(1),
			Constraint::Length(self.search.height()),
			Constraint::Length(1),
			Constraint::Min(0),
		])
		.areas(area);

		// Help bar
		let help = Line::from(vec![
			" KeepK 0.1 ".bold().fg(Color::Red),
			"/".bold().fg(Color::Green),
			" (search) ".fg(Color::White),
			"n".bold().fg(Color::Green),
			" (new) ".fg(Color::White),
			"p".bold().fg(Color::Green),
			" (pin) ".fg(Color::White),
			"a".bold().fg(Color::Green),
			" (archive) ".fg(Color::White),
			"d".bold().fg(Color::Green),
			" (duplicate) ".fg(Color::White),
			"x".bold().fg(Color::Green),
			" (delete) ".fg(Color::White),
			"[]".bold().fg(Color::Green),
			" (color) ".fg(Color::White),
			"q".bold().fg(Color::Green),
			" (quit) ".fg(Color::White),
		])
		.bg(HELP_LINE_BG);
		frame.render_widget(help, help_area);

		// Search
		ctx.area = search_area;
		ctx.selected = self.active == ActiveWidget::Search && self.composer.is_none();
		self.search.render(frame, ctx);

		// Palette
		let mut palette_line = Swatches::line(self.repo.selected_color(), false);
		palette_line.spans.insert(0, " Color ".fg(Color::White));
		frame.render_widget(palette_line.bg(BOARD_BG), palette_area);

		// Sections, pinned notes take at most half of the body
		let pinned_height = if self.pinned.is_empty() {
			3
		} else {
			let wanted = self
				.pinned
				.iter()
				.filter_map(|id| self.repo.get(id))
				.map(|n| Self::format_card(n, 0).height() as u16)
				.sum::<u16>()
				+ 2;
			wanted.min(body.height / 2).max(3)
		};
		let [pinned_area, others_area] =
			Layout::vertical([Constraint::Length(pinned_height), Constraint::Min(0)]).areas(body);

		let notes_active = self.active == ActiveWidget::Notes;
		let pinned_selected = (notes_active && self.selected < self.pinned.len()).then_some(self.selected);
		let others_selected = (notes_active && self.selected >= self.pinned.len())
			.then(|| self.selected - self.pinned.len());
		self.render_section(
			frame,
			pinned_area,
			"Pinned",
			&self.pinned,
			"No pinned notes",
			&self.pinned_state,
			pinned_selected,
		);
		self.render_section(
			frame,
			others_area,
			"Notes",
			&self.others,
			"No notes yet",
			&self.others_state,
			others_selected,
		);

		// Composer
		ctx.area = area;
		if let Some(composer) = &self.composer {
			let horizontal = Layout::horizontal([Constraint::Percentage(60)]).flex(Flex::Center);
			let vertical =
				Layout::vertical([Constraint::Length(composer.height())]).flex(Flex::Center);
			let [popup] = horizontal.areas(area);
			let [popup] = vertical.areas(popup);
			ctx.area = popup;
			ctx.selected = true;
			composer.render(frame, ctx);
			ctx.area = area;
		}
	}

	fn height(&self) -> u16 {
		self.search.height() + 2
	}
}

#[cfg(test)]
mod tests {
	use ratatui::backend::TestBackend;
	use ratatui::Terminal;

	use super::*;
	use crate::data::store::MemoryBackend;
	use crate::data::store::Store;
	use crate::data::store::DEFAULT_KEY;

	fn board() -> Board {
		Board::new(NoteRepository::open(Store::new(MemoryBackend::new(), DEFAULT_KEY)))
	}

	fn press(board: &mut Board, code: KeyCode) -> bool {
		board.input(&KeyEvent::new(code, KeyModifiers::NONE))
	}

	fn ctrl(board: &mut Board, c: char) -> bool {
		board.input(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
	}

	fn type_str(board: &mut Board, text: &str) {
		for c in text.chars() {
			press(board, KeyCode::Char(c));
		}
	}

	fn compose(board: &mut Board, title: &str, content: &str) {
		press(board, KeyCode::Char('n'));
		type_str(board, title);
		press(board, KeyCode::Tab);
		type_str(board, content);
		ctrl(board, 's');
	}

	fn titles(board: &Board) -> Vec<String> {
		board.repository().notes().iter().map(|n| n.title.clone()).collect()
	}

	fn screen(board: &Board) -> String {
		let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
		terminal
			.draw(|frame| {
				let mut ctx = ComponentRenderCtx::new(frame.area());
				board.render(frame, &mut ctx);
			})
			.unwrap();
		let buffer = terminal.backend().buffer();
		buffer.content().iter().map(|cell| cell.symbol()).collect()
	}

	#[test]
	fn composer_adds_note_and_closes() {
		let mut board = board();
		compose(&mut board, "Milk", "buy");
		assert!(!board.is_composing());
		assert_eq!(titles(&board), ["Milk"]);
		assert_eq!(board.selected_id(), Some(board.repository().notes()[0].id.as_str()));
		assert_eq!(board.repository().store().load(), board.repository().notes());
	}

	#[test]
	fn empty_composer_stays_open() {
		let mut board = board();
		press(&mut board, KeyCode::Char('n'));
		type_str(&mut board, "   ");
		ctrl(&mut board, 's');
		assert!(board.is_composing());
		assert!(board.repository().notes().is_empty());
		press(&mut board, KeyCode::Esc);
		assert!(!board.is_composing());
	}

	#[test]
	fn composer_palette_sets_default_color() {
		let mut board = board();
		press(&mut board, KeyCode::Char('n'));
		type_str(&mut board, "Colored");
		press(&mut board, KeyCode::Tab);
		press(&mut board, KeyCode::Tab);
		press(&mut board, KeyCode::Right);
		assert_eq!(board.repository().selected_color(), "#f28b82");
		ctrl(&mut board, 's');
		assert_eq!(board.repository().notes()[0].color, "#f28b82");
	}

	#[test]
	fn actions_apply_to_selected_note() {
		let mut board = board();
		compose(&mut board, "First", "");
		compose(&mut board, "Second", "");

		// Pinning moves the note to the pinned section and keeps it selected
		press(&mut board, KeyCode::Char('j'));
		let first = board.selected_id().unwrap().to_string();
		press(&mut board, KeyCode::Char('p'));
		assert!(board.repository().get(&first).unwrap().pinned);
		assert_eq!(board.selected_id(), Some(first.as_str()));

		press(&mut board, KeyCode::Char('d'));
		assert_eq!(titles(&board), ["First", "Second", "First"]);
		let copy = board.selected_id().unwrap().to_string();
		assert_ne!(copy, first);
		assert!(!board.repository().get(&copy).unwrap().pinned);

		press(&mut board, KeyCode::Char('a'));
		assert!(board.repository().get(&copy).unwrap().archived);
		assert_eq!(board.repository().view().len(), 2);

		press(&mut board, KeyCode::Char('x'));
		assert_eq!(board.repository().notes().len(), 2);
		assert_eq!(board.repository().store().load(), board.repository().notes());
	}

	#[test]
	fn search_filters_on_every_key() {
		let mut board = board();
		compose(&mut board, "Milk", "buy");
		compose(&mut board, "Bread", "");

		press(&mut board, KeyCode::Char('/'));
		assert_eq!(board.active(), ActiveWidget::Search);
		type_str(&mut board, "MIL");
		assert_eq!(board.repository().query(), "mil");
		assert_eq!(board.visible_len(), 1);
		type_str(&mut board, "x");
		assert_eq!(board.visible_len(), 0);
		assert_eq!(board.selected_id(), None);

		press(&mut board, KeyCode::Esc);
		assert_eq!(board.active(), ActiveWidget::Notes);
		press(&mut board, KeyCode::Esc);
		assert_eq!(board.repository().query(), "");
		assert_eq!(board.visible_len(), 2);
	}

	#[test]
	fn quit_keys_are_left_to_the_app() {
		let mut board = board();
		assert!(!press(&mut board, KeyCode::Char('q')));
		press(&mut board, KeyCode::Char('/'));
		assert!(press(&mut board, KeyCode::Char('q')));
		assert!(!ctrl(&mut board, 'c'));
	}

	#[test]
	fn bracket_keys_cycle_color() {
		let mut board = board();
		press(&mut board, KeyCode::Char(']'));
		assert_eq!(board.repository().selected_color(), "#f28b82");
		press(&mut board, KeyCode::Char('['));
		press(&mut board, KeyCode::Char('['));
		assert_eq!(board.repository().selected_color(), "#d7aefb");
	}

	#[test]
	fn renders_empty_messages_and_cards() {
		let mut board = board();
		let text = screen(&board);
		assert!(text.contains("No pinned notes"));
		assert!(text.contains("No notes yet"));

		compose(&mut board, "", "just a body");
		let text = screen(&board);
		assert!(text.contains("Untitled"));
		assert!(text.contains("just a body"));
		assert!(text.contains("No pinned notes"));
		assert!(!text.contains("No notes yet"));
	}
}
