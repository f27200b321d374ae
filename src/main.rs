//! Clipscout CLI entry point.

#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

fn main() {
    match clipscout::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(clipscout::constants::exit_codes::HARD_FAILURE);
        }
    }
}
