use super::Process;
use crate::error::{Result, SimError};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub pid: u32,
    pub arrival: u64,
    pub burst: u64,
    pub wait_time: u64,
    pub turnaround_time: u64,
    pub completed_at: u64,
}

/// Final waiting and turnaround figures for a finished simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub processes: Vec<ProcessMetrics>,
    pub average_wait_time: f64,
    pub average_turnaround_time: f64,
}

impl Summary {
    pub fn total_wait_time(&self) -> u64 {
        self.processes.iter().map(|metrics| metrics.wait_time).sum()
    }

    pub fn total_turnaround_time(&self) -> u64 {
        self.processes.iter().map(|metrics| metrics.turnaround_time).sum()
    }

    /// Time at which the last process completed.
    pub fn makespan(&self) -> u64 {
        self.processes
            .iter()
            .map(|metrics| metrics.completed_at)
            .max()
            .unwrap_or(0)
    }
}

pub fn summarize(processes: &[Process]) -> Result<Summary> {
    if processes.is_empty() {
        return Err(SimError::invalid_input("cannot summarize an empty process table"));
    }

    let processes = processes
        .iter()
        .map(|process| match process.completed_at() {
            Some(completed_at) => Ok(ProcessMetrics {
                pid: process.pid(),
                arrival: process.arrival(),
                burst: process.total_burst(),
                wait_time: process.wait_time(),
                turnaround_time: process.turnaround_time(),
                completed_at,
            }),
            None => Err(SimError::invalid_input(format!(
                "P{} has not completed",
                process.pid()
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    let count = processes.len() as f64;
    let mut summary = Summary {
        processes,
        average_wait_time: 0.0,
        average_turnaround_time: 0.0,
    };
    summary.average_wait_time = summary.total_wait_time() as f64 / count;
    summary.average_turnaround_time = summary.total_turnaround_time() as f64 / count;
    Ok(summary)
}
