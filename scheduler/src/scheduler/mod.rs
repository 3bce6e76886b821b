mod display;
mod fcfs;
mod metrics;
mod process;
mod round_robin;
mod runner;
mod shortest_job;

use crate::error::{Result, SimError};
use std::fmt;

pub use display::replay;
pub use fcfs::FirstComeFirstServed;
pub use metrics::{summarize, ProcessMetrics, Summary};
pub use process::{Process, ProcessSpec};
pub use round_robin::RoundRobinScheduler;
pub use runner::{ProcessRunner, RunnerState, TraceRecord};
pub use shortest_job::ShortestJobFirst;

/// The next process to run and how many ticks it keeps the CPU before the
/// scheduler is consulted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub run_length: u64,
}

pub trait Scheduler {
    const NAME: &'static str;

    /// Picks among `processes` at `time`. Returns `None` when nothing is eligible.
    fn schedule(&mut self, time: u64, processes: &[Process]) -> Option<Selection>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    FirstComeFirstServed,
    ShortestJobFirst,
    RoundRobin,
}

/// A fully configured scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    FirstComeFirstServed,
    ShortestJobFirst,
    RoundRobin { quantum: u64 },
}

impl Policy {
    pub fn new(kind: PolicyKind, quantum: Option<u64>) -> Result<Self> {
        match kind {
            PolicyKind::FirstComeFirstServed => Ok(Policy::FirstComeFirstServed),
            PolicyKind::ShortestJobFirst => Ok(Policy::ShortestJobFirst),
            PolicyKind::RoundRobin => match quantum {
                Some(quantum) => Policy::round_robin(quantum),
                None => Err(SimError::PolicyMisconfiguration(
                    "Round Robin requires a time quantum".to_owned(),
                )),
            },
        }
    }

    pub fn round_robin(quantum: u64) -> Result<Self> {
        let policy = Policy::RoundRobin { quantum };
        policy.validate()?;
        Ok(policy)
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::FirstComeFirstServed => PolicyKind::FirstComeFirstServed,
            Policy::ShortestJobFirst => PolicyKind::ShortestJobFirst,
            Policy::RoundRobin { .. } => PolicyKind::RoundRobin,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Policy::RoundRobin { quantum: 0 } => Err(SimError::invalid_input(
                "time quantum must be a positive integer",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::FirstComeFirstServed => f.write_str(FirstComeFirstServed::NAME),
            Policy::ShortestJobFirst => f.write_str(ShortestJobFirst::NAME),
            Policy::RoundRobin { quantum } => {
                write!(f, "{} with Quantum {}", RoundRobinScheduler::NAME, quantum)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_needs_a_quantum() {
        assert!(matches!(
            Policy::new(PolicyKind::RoundRobin, None),
            Err(SimError::PolicyMisconfiguration(_))
        ));
        assert!(matches!(
            Policy::new(PolicyKind::RoundRobin, Some(0)),
            Err(SimError::InvalidInput(_))
        ));
        assert_eq!(
            Policy::new(PolicyKind::RoundRobin, Some(3)).unwrap(),
            Policy::RoundRobin { quantum: 3 }
        );
    }

    #[test]
    fn quantum_is_ignored_by_other_policies() {
        let policy = Policy::new(PolicyKind::ShortestJobFirst, Some(4)).unwrap();
        assert_eq!(policy, Policy::ShortestJobFirst);
        assert_eq!(policy.kind(), PolicyKind::ShortestJobFirst);
    }

    #[test]
    fn names_match_simulation_headers() {
        assert_eq!(Policy::FirstComeFirstServed.to_string(), "First Come First Served");
        assert_eq!(Policy::ShortestJobFirst.to_string(), "Shortest Job First");
        assert_eq!(
            Policy::RoundRobin { quantum: 2 }.to_string(),
            "Round Robin with Quantum 2"
        );
    }
}
