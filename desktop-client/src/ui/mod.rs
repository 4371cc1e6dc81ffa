mod board;
mod colors;
mod snake_app;

pub use snake_app::SnakeApp;
