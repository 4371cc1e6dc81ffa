pub mod config;
pub mod games;
pub mod high_score;
pub mod logger;
pub mod session;
