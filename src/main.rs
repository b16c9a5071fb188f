use std::env;
use std::fs;
use std::io;
use std::path::Path;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::event::KeyboardEnhancementFlags;
use crossterm::event::PopKeyboardEnhancementFlags;
use crossterm::event::PushKeyboardEnhancementFlags;
use crossterm::event::{self};
use crossterm::execute;
use crossterm::terminal;
use ratatui::DefaultTerminal;
use ratatui::Frame;
use tracing_subscriber::EnvFilter;

use crate::config::Command;
use crate::config::Config;
use crate::data::repository::NoteRepository;
use crate::data::store::DirBackend;
use crate::data::store::MemoryBackend;
use crate::data::store::Store;
use crate::ui::board::Board;
use crate::widgets::widget::Component;
use crate::widgets::widget::ComponentRenderCtx;

pub mod config;
pub mod data;
pub mod style;
pub mod ui;
pub mod widgets;

struct App {
	board: Board,
}

impl App {
	pub fn new(config: &Config) -> Self {
		let store = if config.memory {
			Store::new(MemoryBackend::new(), config.key.clone())
		} else {
			Store::new(DirBackend::new(&config.data_dir), config.key.clone())
		};
		Self {
			board: Board::new(NoteRepository::open(store)),
		}
	}

	fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
		loop {
			terminal.draw(|frame| self.draw(frame))?;

			let Event::Key(key) = event::read()? else {
				continue;
			};
			if key.kind != KeyEventKind::Press || self.board.input(&key) {
				continue;
			}

			let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
			match key.code {
				KeyCode::Char('q') => return Ok(()),
				KeyCode::Char('c') if ctrl_pressed => return Ok(()),
				_ => {}
			}
		}
	}

	fn draw(&self, frame: &mut Frame) {
		let mut ctx = ComponentRenderCtx::new(frame.area());
		self.board.render(frame, &mut ctx);

		if let Some(cursor) = ctx.cursor {
			frame.set_cursor_position(cursor);
		}
	}
}

/// Asks the terminal to report modifiers on keys like enter, so ctrl-enter
/// reaches the composer. Returns whether the flags were pushed.
fn push_keyboard_flags() -> bool {
	if !matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
		tracing::debug!("terminal does not report key modifiers, ctrl-enter unavailable");
		return false;
	}
	match execute!(
		io::stdout(),
		PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
	) {
		Ok(()) => true,
		Err(err) => {
			tracing::warn!("failed to enable keyboard enhancement: {err}");
			false
		}
	}
}

/// Logs go to a daily rolling file, the terminal belongs to the board
fn init_logger(log_dir: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
	fs::create_dir_all(log_dir)
		.map_err(|err| eyre!("failed to create log dir '{}': {err}", log_dir.display()))?;
	let file_appender = tracing_appender::rolling::daily(log_dir, "keepk.log");
	let (writer, guard) = tracing_appender::non_blocking(file_appender);

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,keepk=debug"));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_ansi(false)
		.with_writer(writer)
		.init();

	Ok(guard)
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let args: Vec<String> = env::args().collect();
	let config = match config::parse(&args) {
		Ok(Command::Run(config)) => config,
		Ok(Command::Help(usage)) => {
			print!("{usage}");
			return Ok(());
		}
		Ok(Command::Version) => {
			println!("keepk {}", env!("CARGO_PKG_VERSION"));
			return Ok(());
		}
		Err(err) => {
			eprint!("{}", config::usage(args.first().map_or("keepk", String::as_str)));
			return Err(err.into());
		}
	};

	let _guard = init_logger(&config.log_dir)?;
	tracing::info!(
		data_dir = %config.data_dir.display(),
		key = %config.key,
		memory = config.memory,
		"starting"
	);

	let terminal = ratatui::init();
	let keyboard_flags = push_keyboard_flags();
	let app_result = App::new(&config).run(terminal);
	if keyboard_flags {
		if let Err(err) = execute!(io::stdout(), PopKeyboardEnhancementFlags) {
			tracing::warn!("failed to restore keyboard mode: {err}");
		}
	}
	ratatui::restore();
	app_result
}
