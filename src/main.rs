use clap::Parser;
use log::info;

use source_adder::{cli::Args, toolkit::MiriadToolkit, SourceAdderError};

fn main() {
    // Print the human-readable form of any error, not its debug form.
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), SourceAdderError> {
    let args = Args::parse();
    setup_logging(args.verbosity);
    info!("source_adder {}", env!("CARGO_PKG_VERSION"));

    let params = args.merge()?.into_params()?;
    info!("Adding sources to {}", params.dataset.display());
    params.run(&mut MiriadToolkit)?;
    Ok(())
}

fn setup_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.init();
}
