fn main() {
    if let Err(err) = shelf::run() {
        shelf::report_error(&err);
        std::process::exit(shelf::error_exit_code(&err));
    }
}
