use clap::Parser;
use env_logger::Env;
use vless_linker::cli::{self, Args};

fn main() {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(Env::default().default_filter_or(level));

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
