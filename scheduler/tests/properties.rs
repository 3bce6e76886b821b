use proptest::prelude::*;
use scheduling::{
    build_process_table, simulate, FirstComeFirstServed, Policy, Process, ProcessRunner,
    ProcessSpec, RoundRobinScheduler, Scheduler, ShortestJobFirst, TraceRecord,
};

fn positional(bursts: &[u64]) -> Vec<ProcessSpec> {
    bursts
        .iter()
        .enumerate()
        .map(|(index, &burst)| ProcessSpec::new(index as u32 + 1, burst))
        .collect()
}

/// Explicit arrivals built from non-negative gaps, so idle ticks can occur.
fn with_gaps(jobs: &[(u64, u64)]) -> Vec<ProcessSpec> {
    let mut arrival = 0;
    jobs.iter()
        .enumerate()
        .map(|(index, &(burst, gap))| {
            arrival += gap;
            ProcessSpec::arriving_at(index as u32 + 1, burst, arrival)
        })
        .collect()
}

fn policies(quantum: u64) -> [Policy; 3] {
    [
        Policy::FirstComeFirstServed,
        Policy::ShortestJobFirst,
        Policy::RoundRobin { quantum },
    ]
}

/// Steps `runner` to completion, checking the accounting invariants after every tick.
fn check_accounting<S: Scheduler>(
    mut runner: ProcessRunner<S>,
) -> Result<Vec<Process>, TestCaseError> {
    let mut ticks = 0;
    while let Some(record) = runner.step() {
        ticks += 1;
        prop_assert_eq!(record.time() + 1, runner.time());
        for process in runner.processes() {
            prop_assert_eq!(
                process.wait_time() + process.run_time(),
                process.turnaround_time()
            );
            if !process.has_arrived(record.time()) {
                prop_assert_eq!(process.turnaround_time(), 0);
            }
        }
    }
    prop_assert_eq!(ticks, runner.time());

    let processes = runner.into_processes();
    for process in &processes {
        prop_assert!(process.is_complete());
        let completed_at = process.completed_at().unwrap();
        prop_assert_eq!(process.turnaround_time(), completed_at - process.arrival());
    }
    Ok(processes)
}

proptest! {
    #[test]
    fn prop_wait_plus_run_is_turnaround(
        jobs in proptest::collection::vec((1u64..8, 0u64..4), 1..8),
        quantum in 1u64..5,
    ) {
        let table = build_process_table(&with_gaps(&jobs)).unwrap();
        check_accounting(ProcessRunner::new(FirstComeFirstServed::new(), table.clone()))?;
        check_accounting(ProcessRunner::new(ShortestJobFirst::new(), table.clone()))?;
        check_accounting(ProcessRunner::new(RoundRobinScheduler::new(quantum), table))?;
    }

    #[test]
    fn prop_positional_arrivals_never_idle(
        bursts in proptest::collection::vec(1u64..10, 1..8),
        quantum in 1u64..5,
    ) {
        let total: u64 = bursts.iter().sum();
        for policy in policies(quantum) {
            let outcome = simulate(policy, &positional(&bursts)).unwrap();
            prop_assert_eq!(outcome.trace.len() as u64, total);
            prop_assert!(outcome.trace.iter().all(|record| record.pid().is_some()));
        }
    }

    #[test]
    fn prop_fcfs_completes_in_arrival_order(
        jobs in proptest::collection::vec((1u64..8, 0u64..4), 1..8),
    ) {
        let outcome = simulate(Policy::FirstComeFirstServed, &with_gaps(&jobs)).unwrap();
        let completions: Vec<u64> = outcome
            .processes
            .iter()
            .map(|process| process.completed_at().unwrap())
            .collect();
        prop_assert!(completions.windows(2).all(|pair| pair[0] < pair[1]));

        // Every process, once started, runs to completion without interruption
        let mut runs = outcome.trace.iter().filter_map(TraceRecord::pid).collect::<Vec<_>>();
        runs.dedup();
        let pids: Vec<u32> = outcome.processes.iter().map(Process::pid).collect();
        prop_assert_eq!(runs, pids);
    }

    #[test]
    fn prop_sjf_runs_the_shortest_eligible_job(
        jobs in proptest::collection::vec((1u64..8, 0u64..3), 1..8),
    ) {
        let table = build_process_table(&with_gaps(&jobs)).unwrap();
        let mut runner = ProcessRunner::new(ShortestJobFirst::new(), table);
        loop {
            let time = runner.time();
            let expected = runner
                .processes()
                .iter()
                .filter(|process| process.is_eligible(time))
                .min_by_key(|process| process.remaining_burst())
                .map(Process::pid);
            let Some(record) = runner.step() else { break };
            prop_assert_eq!(record.pid(), expected);
        }
    }

    #[test]
    fn prop_round_robin_slots_never_exceed_quantum(
        jobs in proptest::collection::vec((1u64..12, 0u64..3), 1..8),
        quantum in 1u64..5,
    ) {
        let outcome = simulate(Policy::RoundRobin { quantum }, &with_gaps(&jobs)).unwrap();
        let mut slot = 0;
        for record in &outcome.trace {
            match *record {
                TraceRecord::Run { dispatched: true, .. } => slot = 1,
                TraceRecord::Run { dispatched: false, .. } => slot += 1,
                TraceRecord::Idle { .. } => slot = 0,
            }
            prop_assert!(slot <= quantum);
        }
    }

    #[test]
    fn prop_large_quantum_round_robin_is_fcfs(
        bursts in proptest::collection::vec(1u64..10, 1..8),
    ) {
        let specs = positional(&bursts);
        let fcfs = simulate(Policy::FirstComeFirstServed, &specs).unwrap();
        let rr = simulate(Policy::RoundRobin { quantum: 10 }, &specs).unwrap();
        prop_assert_eq!(fcfs.trace, rr.trace);
        prop_assert_eq!(fcfs.processes, rr.processes);
    }

    #[test]
    fn prop_simulation_is_deterministic(
        jobs in proptest::collection::vec((1u64..8, 0u64..3), 1..8),
        quantum in 1u64..5,
    ) {
        let specs = with_gaps(&jobs);
        for policy in policies(quantum) {
            let first = simulate(policy, &specs).unwrap();
            let second = simulate(policy, &specs).unwrap();
            prop_assert_eq!(first.summary().unwrap(), second.summary().unwrap());
            prop_assert_eq!(first, second);
        }
    }
}
