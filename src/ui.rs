//! Ratatui front-end. The main screen stays underneath for the whole session;
//! search, add-article and the success dialog are popups layered on top.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
