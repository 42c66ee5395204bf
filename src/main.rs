use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use kestrel::{config::Config, interpreter::evaluator::core::Interpreter};
use tracing_subscriber::EnvFilter;

/// kestrel runs scripts written in a small class-based scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Runs the given source text instead of a file.
    #[arg(short, long, value_name = "SOURCE")]
    eval: Option<String>,

    /// Adds a directory to the load path used by `load` and `requireScript`.
    /// May be repeated; searched before `KESTREL_PATH`.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Pipe mode prints the value of every top-level expression statement.
    #[arg(short, long)]
    pipe_mode: bool,

    /// The script to run.
    #[arg(required_unless_present = "eval")]
    file: Option<PathBuf>,
}

/// Logs go to stderr, filtered by `KESTREL_LOG`, then `RUST_LOG`, then
/// `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_env("KESTREL_LOG").or_else(|_| EnvFilter::try_from_default_env())
                                                       .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let mut config = Config::from_env().echoing(args.pipe_mode);
    config.load_path.splice(0..0, args.include);
    let mut interpreter = Interpreter::new(config);

    let result = match (&args.eval, &args.file) {
        (Some(source), _) => interpreter.run(source, "<eval>"),
        (None, Some(path)) => interpreter.run_file(path),
        (None, None) => return ExitCode::FAILURE,
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
