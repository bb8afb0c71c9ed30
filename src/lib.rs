pub mod audio;
pub mod config;
pub mod content;
pub mod domain;
pub mod filters;
pub mod handlers;
pub mod paths;
pub mod session;
pub mod state;
pub mod study;

#[cfg(test)]
pub mod testing;
