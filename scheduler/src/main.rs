use clap::{Parser, ValueEnum};
use scheduling::{
    build_process_table, compare, loader, logging,
    report::{self, Report},
    scheduler::replay,
    simulate, simulate_with, summarize, Policy, PolicyKind, ProcessSpec, Result, SimError,
};
use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// First Come First Served
    Fcfs,
    /// Shortest Job First, preemptive
    Sjf,
    /// Round Robin, needs --quantum
    Rr,
    /// All three side by side, needs --quantum
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Simulates CPU scheduling policies over a list of processes.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Process list, one `P<id>,<burst>[,<arrival>]` per line in arrival order
    file: PathBuf,

    #[arg(short, long, value_enum, default_value_t = PolicyArg::Fcfs)]
    policy: PolicyArg,

    /// Round Robin time quantum
    #[arg(short, long)]
    quantum: Option<u64>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Only print the final waiting and turnaround times
    #[arg(long)]
    summary_only: bool,

    /// Step through the simulation in a terminal UI
    #[arg(short, long, conflicts_with_all = ["format", "summary_only"])]
    interactive: bool,

    #[arg(long, default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,
}

impl Args {
    fn policies(&self) -> Result<Vec<Policy>> {
        let kinds: &[PolicyKind] = match self.policy {
            PolicyArg::Fcfs => &[PolicyKind::FirstComeFirstServed],
            PolicyArg::Sjf => &[PolicyKind::ShortestJobFirst],
            PolicyArg::Rr => &[PolicyKind::RoundRobin],
            PolicyArg::All => &[
                PolicyKind::FirstComeFirstServed,
                PolicyKind::ShortestJobFirst,
                PolicyKind::RoundRobin,
            ],
        };
        kinds
            .iter()
            .map(|&kind| Policy::new(kind, self.quantum))
            .collect()
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging_with_level(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let specs = loader::load_processes(&args.file)?;
    let policies = args.policies()?;
    info!(file = ?args.file, processes = specs.len(), "Loaded process list");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match policies.as_slice() {
        [policy] if args.interactive => run_interactive(&mut out, *policy, &specs)?,
        [_, ..] if args.interactive => {
            return Err(SimError::PolicyMisconfiguration(
                "the interactive view runs one policy at a time".to_owned(),
            ))
        }
        [policy] => run_single(&mut out, args, *policy, &specs)?,
        _ => run_comparison(&mut out, args, &policies, &specs)?,
    }

    out.flush().map_err(SimError::Output)
}

fn run_single<W: Write>(
    out: &mut W,
    args: &Args,
    policy: Policy,
    specs: &[ProcessSpec],
) -> Result<()> {
    if args.format == Format::Json {
        let outcome = simulate(policy, specs)?;
        let summary = outcome.summary()?;
        let trace = (!args.summary_only).then_some(outcome.trace.as_slice());
        let json = report::to_json(&Report::new(&policy, trace, &summary))?;
        return writeln!(out, "{}", json).map_err(SimError::Output);
    }

    report::write_header(out, &policy).map_err(SimError::Output)?;

    // Trace lines are written as the simulation produces them
    let mut written = Ok(());
    let processes = simulate_with(policy, specs, |record| {
        if written.is_ok() && !args.summary_only {
            written = report::write_trace_line(out, record);
        }
    })?;
    written.map_err(SimError::Output)?;

    let summary = summarize(&processes)?;
    report::write_summary(out, &summary).map_err(SimError::Output)
}

fn run_comparison<W: Write>(
    out: &mut W,
    args: &Args,
    policies: &[Policy],
    specs: &[ProcessSpec],
) -> Result<()> {
    let outcomes = compare(policies, specs)?;
    let summaries = outcomes
        .iter()
        .map(|outcome| outcome.summary())
        .collect::<Result<Vec<_>>>()?;

    if args.format == Format::Json {
        let reports: Vec<_> = outcomes
            .iter()
            .zip(&summaries)
            .map(|(outcome, summary)| {
                let trace = (!args.summary_only).then_some(outcome.trace.as_slice());
                Report::new(&outcome.policy, trace, summary)
            })
            .collect();
        let json = report::to_json(&reports)?;
        return writeln!(out, "{}", json).map_err(SimError::Output);
    }

    let write = |out: &mut W| -> io::Result<()> {
        for (outcome, summary) in outcomes.iter().zip(&summaries) {
            report::write_header(out, &outcome.policy)?;
            if !args.summary_only {
                for record in &outcome.trace {
                    report::write_trace_line(out, record)?;
                }
            }
            report::write_summary(out, summary)?;
            writeln!(out)?;
        }
        let rows: Vec<_> = outcomes
            .iter()
            .map(|outcome| outcome.policy)
            .zip(summaries.iter().cloned())
            .collect();
        report::write_comparison(out, &rows)
    };
    write(out).map_err(SimError::Output)
}

fn run_interactive<W: Write>(out: &mut W, policy: Policy, specs: &[ProcessSpec]) -> Result<()> {
    let processes = replay(policy, build_process_table(specs)?)?;

    if processes.iter().all(|process| process.is_complete()) {
        report::write_header(out, &policy).map_err(SimError::Output)?;
        report::write_summary(out, &summarize(&processes)?).map_err(SimError::Output)
    } else {
        info!(policy = %policy, "Replay closed before the simulation finished");
        Ok(())
    }
}
