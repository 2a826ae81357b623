#![warn(clippy::uninlined_format_args)]

mod bootstrap;
mod cli;
mod commands;

fn main() {
    bootstrap::run();
}
