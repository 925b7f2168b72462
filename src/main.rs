fn main() {
    if let Err(e) = totion::app::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
