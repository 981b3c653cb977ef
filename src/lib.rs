pub mod args;
pub mod config;
pub mod messages;
pub mod quiz;
pub mod robot;
pub mod runtime;
pub mod teleop;
