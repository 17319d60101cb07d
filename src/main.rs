use ping_echo::cli::{self, Invocation};
use ping_echo::{GenericError, StopCondition};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let invocation = match cli::parse(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            println!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(invocation.verbose) {
        eprintln!("could not set up logging: {e}");
    }

    match ping(&invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<(), GenericError> {
    let max_level = if verbose { Level::TRACE } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(max_level).with_writer(io::stderr).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn ping(invocation: &Invocation) -> Result<(), GenericError> {
    let target = ping_echo::resolve(&invocation.host)?;
    tracing::trace!("resolved {} to {}", invocation.host, target.ip_addr);

    let stop = StopCondition::new();
    ping_echo::stop_on_signals(&stop)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", ping_echo::banner(&invocation.host, &target, &invocation.config))?;
    let stats = ping_echo::run(&invocation.config, &target, &stop, &mut out)?;
    writeln!(out, "\n{}", stats.report())?;
    Ok(())
}
