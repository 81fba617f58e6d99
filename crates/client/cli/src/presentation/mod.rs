//! Terminal presentation components used by the CLI client.
pub mod renderer;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use renderer::{PlainRenderer, TuiRenderer};
pub use ui::Screen;
