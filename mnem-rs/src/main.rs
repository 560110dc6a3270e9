use mnem::cli;
use mnem::config::Config;
use mnem::script::Interpreter;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Log filter override, e.g. `MNEM_LOG=mnem=trace`.
const LOG_ENV: &str = "MNEM_LOG";

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => e.exit(),
    };
    init_logging(args.verbose);

    // ── Configuration ─────────────────────────────────────────────────────────
    let config = match Config::from_args(&args) {
        Ok(c) => c,
        Err(e) => {
            println!("{e}");
            std::process::exit(1);
        }
    };
    debug!(
        script = %config.script.display(),
        lib_dirs = config.lib_dirs.len(),
        max_depth = config.max_depth,
        "starting"
    );

    // ── Run ───────────────────────────────────────────────────────────────────
    let script = config.script.clone();
    let mut interp = Interpreter::new(config);
    if let Err(e) = interp.run_file(&script) {
        println!("{e}");
        std::process::exit(1);
    }
}
