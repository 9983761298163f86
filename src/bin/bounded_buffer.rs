use clap::Parser;
use dmxp_bounded::{Config, ShutdownError, ShutdownReport};
use std::sync::mpsc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Run the bounded buffer until Ctrl-C or for a fixed time, then shut it down.
#[derive(Parser, Debug)]
#[command(name = "bounded-buffer", version, about)]
struct Args {
    /// Number of buffer slots.
    #[arg(long, default_value_t = 8, allow_negative_numbers = true)]
    capacity: i64,

    /// Number of producer threads.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    producers: i64,

    /// Number of consumer threads.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    consumers: i64,

    /// Pause before every buffer operation, in milliseconds.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    delay_ms: i64,

    /// Stop after this many seconds; 0 runs until Ctrl-C.
    #[arg(long, default_value_t = 0)]
    run_for_secs: u64,

    /// Log every produced and consumed item.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "dmxp_bounded=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_params(args.capacity, args.producers, args.consumers, args.delay_ms)?;
    let system = dmxp_bounded::start(config)?;

    let (tx, rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })?;

    if args.run_for_secs == 0 {
        tracing::info!("running until Ctrl-C");
        let _ = rx.recv();
    } else {
        let _ = rx.recv_timeout(Duration::from_secs(args.run_for_secs));
    }

    finish(dmxp_bounded::stop(system))?;
    Ok(())
}

/// Print the shutdown report, even when some worker failed to join, and pass
/// the join failure on so the process exits non-zero.
fn finish(outcome: Result<ShutdownReport, ShutdownError>) -> Result<(), ShutdownError> {
    let report = match &outcome {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            err.report()
        }
    };

    println!("Produced: {}", report.stats.produced);
    println!("Consumed: {}", report.stats.consumed);
    println!("Drained:  {}", report.drained);
    println!("Peak occupancy: {}", report.stats.peak_occupancy);
    println!("Interrupted waits: {}", report.stats.interrupted_waits);

    outcome.map(drop)
}
