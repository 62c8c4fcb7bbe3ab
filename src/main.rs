fn main() {
    if let Err(err) = stylekit::app::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
