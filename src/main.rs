fn main() {
    if let Err(err) = boxlink::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
