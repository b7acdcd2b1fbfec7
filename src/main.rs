fn main() {
    if let Err(err) = cdrview::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
