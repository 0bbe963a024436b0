pub mod backend;
pub mod categories;
pub mod info_window;
pub mod overlay;
pub mod renderer;
