use super::{Process, Scheduler, Selection};

/// Runs processes in arrival order, each for its whole burst.
#[derive(Debug, Default)]
pub struct FirstComeFirstServed;

impl FirstComeFirstServed {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for FirstComeFirstServed {
    const NAME: &'static str = "First Come First Served";

    fn schedule(&mut self, time: u64, processes: &[Process]) -> Option<Selection> {
        // Selections run to completion, so the first incomplete process has never started
        let (index, process) = processes
            .iter()
            .enumerate()
            .find(|(_, process)| !process.is_complete())?;

        if !process.has_arrived(time) {
            return None;
        }

        Some(Selection {
            index,
            run_length: process.remaining_burst(),
        })
    }
}
