pub mod canvas;
pub mod cell;
pub mod display;

pub use canvas::Canvas;
pub use display::DisplayManager;
pub use display::DisplayMode;
