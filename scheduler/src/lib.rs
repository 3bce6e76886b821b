//! Discrete-time CPU scheduling simulator.
//!
//! Simulates First Come First Served, preemptive Shortest Job First and
//! fixed-order Round Robin over a list of processes, one tick of simulated
//! time at a time, and summarizes waiting and turnaround times.
//!
//! ```
//! use scheduling::{simulate, summarize, Policy, ProcessSpec};
//!
//! let specs = [ProcessSpec::new(1, 5), ProcessSpec::new(2, 3), ProcessSpec::new(3, 8)];
//! let outcome = simulate(Policy::RoundRobin { quantum: 2 }, &specs).unwrap();
//! assert_eq!(outcome.trace.len(), 16);
//!
//! let summary = summarize(&outcome.processes).unwrap();
//! assert_eq!(summary.average_wait_time, 6.0);
//! ```

pub mod error;
pub mod loader;
pub mod logging;
pub mod report;
pub mod scheduler;

use std::collections::HashSet;
use std::thread;

pub use error::{Result, SimError};
pub use scheduler::{
    summarize, FirstComeFirstServed, Policy, PolicyKind, Process, ProcessMetrics, ProcessRunner,
    ProcessSpec, RoundRobinScheduler, RunnerState, Scheduler, Selection, ShortestJobFirst,
    Summary, TraceRecord,
};

/// Everything a finished simulation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub policy: Policy,
    pub trace: Vec<TraceRecord>,
    pub processes: Vec<Process>,
}

impl Outcome {
    pub fn summary(&self) -> Result<Summary> {
        summarize(&self.processes)
    }
}

/// Validates the input list and builds the initial process table.
pub fn build_process_table(specs: &[ProcessSpec]) -> Result<Vec<Process>> {
    if specs.is_empty() {
        return Err(SimError::invalid_input("the process list is empty"));
    }

    let mut seen = HashSet::new();
    let mut processes: Vec<Process> = Vec::with_capacity(specs.len());
    for (position, spec) in specs.iter().enumerate() {
        if spec.burst == 0 {
            return Err(SimError::invalid_input(format!(
                "P{} has a burst time of 0, burst times must be positive",
                spec.pid
            )));
        }
        if !seen.insert(spec.pid) {
            return Err(SimError::invalid_input(format!(
                "process id P{} appears more than once",
                spec.pid
            )));
        }

        let process = Process::from_spec(*spec, position);
        if let Some(previous) = processes.last() {
            if process.arrival() < previous.arrival() {
                return Err(SimError::invalid_input(format!(
                    "P{} arrives at {} before P{} at {}, processes must be listed in arrival order",
                    process.pid(),
                    process.arrival(),
                    previous.pid(),
                    previous.arrival()
                )));
            }
        }
        processes.push(process);
    }
    Ok(processes)
}

fn run<F>(policy: Policy, processes: Vec<Process>, on_tick: F) -> Vec<Process>
where
    F: FnMut(&TraceRecord),
{
    match policy {
        Policy::FirstComeFirstServed => {
            ProcessRunner::new(FirstComeFirstServed::new(), processes).run(on_tick)
        }
        Policy::ShortestJobFirst => {
            ProcessRunner::new(ShortestJobFirst::new(), processes).run(on_tick)
        }
        Policy::RoundRobin { quantum } => {
            ProcessRunner::new(RoundRobinScheduler::new(quantum), processes).run(on_tick)
        }
    }
}

/// Runs `policy` over `specs`, handing each trace record to `on_tick` as it is produced.
pub fn simulate_with<F>(policy: Policy, specs: &[ProcessSpec], on_tick: F) -> Result<Vec<Process>>
where
    F: FnMut(&TraceRecord),
{
    policy.validate()?;
    let processes = build_process_table(specs)?;
    Ok(run(policy, processes, on_tick))
}

/// Runs `policy` over `specs` and collects the whole trace.
pub fn simulate(policy: Policy, specs: &[ProcessSpec]) -> Result<Outcome> {
    let mut trace = Vec::new();
    let processes = simulate_with(policy, specs, |record| trace.push(*record))?;
    Ok(Outcome {
        policy,
        trace,
        processes,
    })
}

/// Runs every policy over its own copy of the process table, each on its own
/// thread. Outcomes come back in the order of `policies`.
pub fn compare(policies: &[Policy], specs: &[ProcessSpec]) -> Result<Vec<Outcome>> {
    for policy in policies {
        policy.validate()?;
    }
    let processes = build_process_table(specs)?;

    let outcomes: Vec<Outcome> = thread::scope(|scope| {
        let handles: Vec<_> = policies
            .iter()
            .map(|&policy| {
                let processes = processes.clone();
                scope.spawn(move || {
                    let mut trace = Vec::new();
                    let processes = run(policy, processes, |record| trace.push(*record));
                    Outcome {
                        policy,
                        trace,
                        processes,
                    }
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });
    Ok(outcomes)
}
