use crossterm::event::KeyEvent;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::Frame;

/// Render context for [`Component`]
pub struct ComponentRenderCtx {
	pub area: Rect,
	pub selected: bool,
	/// Where the terminal cursor should be placed once the frame is drawn
	pub cursor: Option<Position>,
}

impl ComponentRenderCtx {
	pub fn new(area: Rect) -> Self {
		Self {
			area,
			selected: false,
			cursor: None,
		}
	}
}

pub trait Component {
	/// Send inputs to the component, returns whether the key was consumed
	fn input(&mut self, key: &KeyEvent) -> bool;
	/// Render the component
	fn render(&self, frame: &mut Frame, ctx: &mut ComponentRenderCtx);
	/// Widget height, for vertical layouts
	fn height(&self) -> u16;
}
