pub mod app;
pub mod frame_source;
pub mod grid;
pub mod launcher;
pub mod playback;
pub mod point_generator;

pub use app::App;
