use super::{Process, Scheduler, Selection};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// What happened during one tick of simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    /// A process ran. Counters are as of the end of the tick.
    Run {
        time: u64,
        pid: u32,
        remaining_burst: u64,
        wait_time: u64,
        turnaround_time: u64,
        /// First tick of a new selection.
        dispatched: bool,
    },
    /// Nothing had arrived that could run.
    Idle { time: u64 },
}

impl TraceRecord {
    pub fn time(&self) -> u64 {
        match *self {
            TraceRecord::Run { time, .. } | TraceRecord::Idle { time } => time,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        match *self {
            TraceRecord::Run { pid, .. } => Some(pid),
            TraceRecord::Idle { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Running,
    Done,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    ticks_left: u64,
}

/// Drives a process table through simulated time, one tick per `step`.
pub struct ProcessRunner<S> {
    scheduler: S,
    processes: Vec<Process>,
    time: u64,
    slot: Option<Slot>,
}

impl<S: Scheduler> ProcessRunner<S> {
    pub fn new(scheduler: S, processes: Vec<Process>) -> Self {
        info!(
            policy = S::NAME,
            processes = processes.len(),
            "Starting simulation"
        );
        Self {
            scheduler,
            processes,
            time: 0,
            slot: None,
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }

    /// Simulated time of the next tick.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Process holding the CPU, if a selection is in progress.
    pub fn current_process(&self) -> Option<&Process> {
        self.slot.and_then(|slot| self.processes.get(slot.index))
    }

    pub fn state(&self) -> RunnerState {
        if self.processes.iter().all(Process::is_complete) {
            RunnerState::Done
        } else {
            RunnerState::Running
        }
    }

    fn poll_slot(&mut self) -> Option<(Slot, bool)> {
        if let Some(slot) = self.slot {
            if slot.ticks_left > 0 && !self.processes[slot.index].is_complete() {
                return Some((slot, false));
            }
        }

        let Selection { index, run_length } = self.scheduler.schedule(self.time, &self.processes)?;
        let process = &self.processes[index];
        assert!(
            process.is_eligible(self.time) && run_length > 0,
            "{} selected P{} at T{} with run length {}",
            S::NAME,
            process.pid(),
            self.time,
            run_length
        );
        debug!(
            time = self.time,
            pid = process.pid(),
            run_length,
            "Dispatching process"
        );
        Some((
            Slot {
                index,
                ticks_left: run_length,
            },
            true,
        ))
    }

    /// Advances the simulation by one tick. Returns `None` once every process has completed.
    pub fn step(&mut self) -> Option<TraceRecord> {
        if self.state() == RunnerState::Done {
            return None;
        }

        let time = self.time;
        let Some((slot, dispatched)) = self.poll_slot() else {
            warn!(time, "No process eligible, CPU idle");
            self.slot = None;
            self.time += 1;
            return Some(TraceRecord::Idle { time });
        };

        for (index, process) in self.processes.iter_mut().enumerate() {
            if index != slot.index && process.is_eligible(time) {
                process.wait();
            }
        }

        let active = &mut self.processes[slot.index];
        active.run(time);
        let record = TraceRecord::Run {
            time,
            pid: active.pid(),
            remaining_burst: active.remaining_burst(),
            wait_time: active.wait_time(),
            turnaround_time: active.turnaround_time(),
            dispatched,
        };
        trace!(?record, "Tick");
        if active.is_complete() {
            debug!(time = time + 1, pid = active.pid(), "Process completed");
        }

        self.slot = Some(Slot {
            ticks_left: slot.ticks_left - 1,
            ..slot
        });
        self.time += 1;

        if self.state() == RunnerState::Done {
            info!(policy = S::NAME, ticks = self.time, "Simulation finished");
        }
        Some(record)
    }

    /// Runs to completion, handing every trace record to `on_tick`.
    pub fn run<F>(mut self, mut on_tick: F) -> Vec<Process>
    where
        F: FnMut(&TraceRecord),
    {
        while let Some(record) = self.step() {
            on_tick(&record);
        }
        self.processes
    }
}

impl<S: Scheduler> Iterator for ProcessRunner<S> {
    type Item = TraceRecord;

    fn next(&mut self) -> Option<TraceRecord> {
        self.step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FirstComeFirstServed, RoundRobinScheduler, ShortestJobFirst};

    fn example() -> Vec<Process> {
        vec![
            Process::new(1, 0, 5),
            Process::new(2, 1, 3),
            Process::new(3, 2, 8),
        ]
    }

    #[test]
    fn starts_running_and_ends_done() {
        let mut runner = ProcessRunner::new(FirstComeFirstServed::new(), example());
        assert_eq!(runner.state(), RunnerState::Running);
        assert_eq!(runner.time(), 0);

        let ticks = runner.by_ref().count();
        assert_eq!(ticks, 16);
        assert_eq!(runner.state(), RunnerState::Done);
        assert_eq!(runner.step(), None);
    }

    #[test]
    fn trace_reports_counters_after_the_tick() {
        let mut runner = ProcessRunner::new(FirstComeFirstServed::new(), example());
        assert_eq!(
            runner.step(),
            Some(TraceRecord::Run {
                time: 0,
                pid: 1,
                remaining_burst: 4,
                wait_time: 0,
                turnaround_time: 1,
                dispatched: true,
            })
        );
        assert_eq!(
            runner.step(),
            Some(TraceRecord::Run {
                time: 1,
                pid: 1,
                remaining_burst: 3,
                wait_time: 0,
                turnaround_time: 2,
                dispatched: false,
            })
        );
        // P2 arrived at T1 and has waited one tick, P3 has not arrived yet
        assert_eq!(runner.processes()[1].wait_time(), 1);
        assert_eq!(runner.processes()[2].turnaround_time(), 0);
    }

    #[test]
    fn shortest_job_preempts_on_arrival() {
        let pids: Vec<_> = ProcessRunner::new(ShortestJobFirst::new(), example())
            .filter_map(|record| record.pid())
            .take(5)
            .collect();
        assert_eq!(pids, vec![1, 2, 2, 2, 1]);
    }

    #[test]
    fn round_robin_dispatches_once_per_slot() {
        let dispatches: Vec<_> = ProcessRunner::new(RoundRobinScheduler::new(2), example())
            .filter_map(|record| match record {
                TraceRecord::Run {
                    time,
                    pid,
                    dispatched: true,
                    ..
                } => Some((time, pid)),
                _ => None,
            })
            .collect();
        assert_eq!(
            dispatches,
            vec![
                (0, 1),
                (2, 2),
                (4, 3),
                (6, 1),
                (8, 2),
                (9, 3),
                (11, 1),
                (12, 3),
                (14, 3)
            ]
        );
    }

    #[test]
    fn idles_until_the_first_arrival() {
        let processes = vec![Process::new(1, 2, 1), Process::new(2, 2, 1)];
        let trace: Vec<_> = ProcessRunner::new(RoundRobinScheduler::new(1), processes).collect();
        assert_eq!(trace[0], TraceRecord::Idle { time: 0 });
        assert_eq!(trace[1], TraceRecord::Idle { time: 1 });
        assert_eq!(trace[2].pid(), Some(1));
        assert_eq!(trace[3].pid(), Some(2));
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn run_returns_the_final_table() {
        let mut ticks = 0;
        let processes =
            ProcessRunner::new(ShortestJobFirst::new(), example()).run(|_| ticks += 1);
        assert_eq!(ticks, 16);
        assert!(processes.iter().all(Process::is_complete));
    }
}
