use std::process;

use clap::Parser;
use frametrace::{StackTrace, Tracer, report};
use owo_colors::OwoColorize;

mod demo;

#[derive(Parser)]
#[command(name = "frametrace", about = "Capture and render structured stack traces")]
struct Cli {
    /// Trace a guarded call that panics with this message instead of the current stack
    #[arg(long)]
    panic: Option<String>,
    /// Print the trace as JSON
    #[arg(long)]
    json: bool,
    /// Print a context value after the trace
    #[arg(long)]
    context: Option<String>,
    /// Keep only this many of the most recent frames
    #[arg(long)]
    max_frames: Option<usize>,
    /// Print version and exit
    #[arg(long)]
    version: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default())
        .format_timestamp(None)
        .try_init()
        .ok();

    let cli = Cli::parse();

    if cli.version {
        println!(
            "{} {}",
            "frametrace".bright_cyan().bold(),
            env!("CARGO_PKG_VERSION").bright_black()
        );
        return;
    }

    let mut tracer = Tracer::new();
    if let Some(max) = cli.max_frames {
        tracer = tracer.with_max_frames(max);
    }

    let trace = match cli.panic {
        Some(message) => match tracer.invoke_guarded(|| demo::run(&message)) {
            Ok(()) => {
                log::warn!("guarded demo returned without panicking");
                return;
            }
            Err(trace) => trace,
        },
        None => tracer.current(),
    };

    if let Err(err) = emit(cli.context.as_deref(), cli.json, &trace) {
        eprintln!("{} {err:?}", "error:".red().bold());
        process::exit(1);
    }
}

fn emit(context: Option<&str>, json: bool, trace: &StackTrace) -> miette::Result<()> {
    if json {
        println!("{}", trace.to_json()?);
        return Ok(());
    }

    let printed = match context {
        Some(context) => report::print_trace_with_context(trace, &context),
        None => report::print_trace(trace),
    };
    printed.map_err(|err| miette::miette!("could not write trace: {err}"))
}
