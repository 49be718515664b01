fn main() {
    let code = adoc_relations::app::run_from(std::env::args_os());
    if code != 0 {
        std::process::exit(code);
    }
}
