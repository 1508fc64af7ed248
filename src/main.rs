fn main() {
    if let Err(err) = scansummary::cli::run() {
        scansummary::ui::eprintln_error(&err);
        std::process::exit(scansummary::exit::exit_code(&err));
    }
}
