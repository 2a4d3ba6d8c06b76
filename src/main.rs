fn main() {
    if let Err(err) = csv_report::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
