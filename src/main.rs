use napigen::cli;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            // Scan failures have already been rendered as diagnostics.
            if e.to_string() == cli::SCAN_FAILED {
                std::process::exit(1);
            }
            eprintln!("Error: {e:?}");
            std::process::exit(1);
        }
    }
}
