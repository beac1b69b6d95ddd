fn main() {
    if let Err(err) = sketch_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
