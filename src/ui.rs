//! Ratatui front-end: a sign-in screen gating a student table with add, edit,
//! and delete dialogs. All persistence goes through `Session`; this layer only
//! keeps presentation state such as the highlighted row and open forms.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
