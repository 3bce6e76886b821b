use super::{Process, Scheduler, Selection};

/// Shortest remaining burst first, re-evaluated every tick so that a shorter
/// arrival preempts the running process.
#[derive(Debug, Default)]
pub struct ShortestJobFirst;

impl ShortestJobFirst {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for ShortestJobFirst {
    const NAME: &'static str = "Shortest Job First";

    fn schedule(&mut self, time: u64, processes: &[Process]) -> Option<Selection> {
        // min_by_key keeps the first of equal keys, so ties go to the earliest arrival
        let index = processes
            .iter()
            .enumerate()
            .filter(|(_, process)| process.is_eligible(time))
            .min_by_key(|(_, process)| process.remaining_burst())?
            .0;

        Some(Selection {
            index,
            run_length: 1,
        })
    }
}
