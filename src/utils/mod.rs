pub mod canvas;
pub mod date;
pub mod errors;
pub mod export;
pub mod screen;

pub use errors::DashResult;
pub use screen::Screen;
