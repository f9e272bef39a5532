use refurnish::cli::run_cli;

fn main() {
    refurnish::init();
    if let Err(err) = run_cli() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
