mod event;
mod terminal;


pub use terminal::TerminalRenderer;
