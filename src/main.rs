mod app;
mod host;
mod logic;
mod models;
mod ui;
mod utils;

use std::process::ExitCode;

fn main() -> ExitCode {
    app::run()
}
