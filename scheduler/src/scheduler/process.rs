/// A process as described by the input list, before it is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub pid: u32,
    pub burst: u64,
    /// Explicit arrival time. When absent the process arrives at its position in the list.
    pub arrival: Option<u64>,
}

impl ProcessSpec {
    pub fn new(pid: u32, burst: u64) -> Self {
        Self {
            pid,
            burst,
            arrival: None,
        }
    }

    pub fn arriving_at(pid: u32, burst: u64, arrival: u64) -> Self {
        Self {
            pid,
            burst,
            arrival: Some(arrival),
        }
    }
}

/// Run-state of a single process inside a simulation.
///
/// Only the runner mutates a process, one tick at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: u32,
    arrival: u64,
    total_burst: u64,
    remaining_burst: u64,
    wait_time: u64,
    turnaround_time: u64,
    completed_at: Option<u64>,
}

impl Process {
    pub fn new(pid: u32, arrival: u64, burst: u64) -> Self {
        Self {
            pid,
            arrival,
            total_burst: burst,
            remaining_burst: burst,
            wait_time: 0,
            turnaround_time: 0,
            completed_at: None,
        }
    }

    pub fn from_spec(spec: ProcessSpec, position: usize) -> Self {
        Process::new(spec.pid, spec.arrival.unwrap_or(position as u64), spec.burst)
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    pub fn total_burst(&self) -> u64 {
        self.total_burst
    }

    pub fn remaining_burst(&self) -> u64 {
        self.remaining_burst
    }

    pub fn wait_time(&self) -> u64 {
        self.wait_time
    }

    pub fn turnaround_time(&self) -> u64 {
        self.turnaround_time
    }

    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    /// Ticks spent on the CPU so far.
    pub fn run_time(&self) -> u64 {
        self.total_burst - self.remaining_burst
    }

    pub fn has_arrived(&self, time: u64) -> bool {
        self.arrival <= time
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_burst == 0
    }

    /// Arrived and not yet complete.
    pub fn is_eligible(&self, time: u64) -> bool {
        self.has_arrived(time) && !self.is_complete()
    }

    pub(crate) fn run(&mut self, time: u64) {
        self.remaining_burst = self
            .remaining_burst
            .checked_sub(1)
            .unwrap_or_else(|| panic!("P{} was run after it completed", self.pid));
        self.turnaround_time += 1;
        if self.remaining_burst == 0 {
            self.completed_at = Some(time + 1);
        }
    }

    pub(crate) fn wait(&mut self) {
        self.wait_time += 1;
        self.turnaround_time += 1;
    }
}
