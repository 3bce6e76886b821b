use super::{Process, Scheduler, Selection};

/// Fixed-order Round Robin.
///
/// Processes are visited in arrival order, one sweep after another. A process
/// that still has burst left after its slot waits for the next sweep rather
/// than being requeued behind the others.
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: u64,
    next_process: usize,
}

impl RoundRobinScheduler {
    pub fn new(quantum: u64) -> Self {
        assert!(quantum > 0, "Round Robin quantum must be positive");
        Self {
            quantum,
            next_process: 0,
        }
    }

    pub fn quantum(&self) -> u64 {
        self.quantum
    }

    fn poll_process(&self, time: u64, processes: &[Process]) -> Option<usize> {
        // The rest of the current sweep, then a fresh sweep from the first process
        (self.next_process..processes.len())
            .chain(0..self.next_process.min(processes.len()))
            .find(|&index| processes[index].is_eligible(time))
    }
}

impl Scheduler for RoundRobinScheduler {
    const NAME: &'static str = "Round Robin";

    fn schedule(&mut self, time: u64, processes: &[Process]) -> Option<Selection> {
        match self.poll_process(time, processes) {
            Some(index) => {
                self.next_process = index + 1;
                Some(Selection {
                    index,
                    run_length: processes[index].remaining_burst().min(self.quantum),
                })
            }
            None => {
                self.next_process = 0;
                None
            }
        }
    }
}
