use clap::Parser;
use toronto_opendata::{defaultlogger::register_messenger_default, message};

mod commands;

use commands::Cli;

fn main() {
    if let Err(e) = register_messenger_default() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => {}
        Err(e) => {
            message!("failed: {}", e);
            std::process::exit(1);
        }
    }
}
