pub mod loading;
pub mod popup;
pub mod theme;
