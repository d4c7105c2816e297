pub mod completions;
pub mod config;
pub mod repeat;
pub mod sound;
pub mod timer;
