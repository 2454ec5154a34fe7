//! ochre - a small terminal text editor with incremental syntax
//! highlighting

mod buffer;
mod command;
mod config;
mod display;
mod editor;
mod error;
mod input;
mod line;
mod syntax;
mod terminal;
mod window;

use std::env;
use std::path::PathBuf;
use std::process;

use config::Config;
use editor::EditorState;
use error::Result;
use terminal::Terminal;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                println!("ochre {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            _ => {}
        }
    }

    let config = Config::load();
    let terminal = Terminal::new()?;
    let mut editor = EditorState::new(terminal, config);

    if args.len() > 1 && !args[1].starts_with('-') {
        editor.open_file(&PathBuf::from(&args[1]));
    }

    editor.run()
}

fn print_usage() {
    println!("Usage: ochre [OPTIONS] [FILE]");
    println!();
    println!("Options:");
    println!("  -h, --help     Print this help");
    println!("  -V, --version  Print version");
    println!();
    println!("Configuration is read from ~/.ochre.toml");
}
