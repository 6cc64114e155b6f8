use jailsh::ui::output;

fn main() {
    if let Err(err) = jailsh::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
