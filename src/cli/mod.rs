mod args;
mod commands;
mod config_cmd;
mod interactive;
mod render;
mod util;

pub use args::Cli;
