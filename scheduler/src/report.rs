//! Text and JSON rendering of traces and summaries.

use crate::scheduler::{Policy, Summary, TraceRecord};
use serde::Serialize;
use std::io::{self, Write};

pub fn trace_line(record: &TraceRecord) -> String {
    match *record {
        TraceRecord::Run {
            time,
            pid,
            remaining_burst,
            wait_time,
            turnaround_time,
            ..
        } => format!(
            "T{:<3} : P{:<3} - Burst left {:>3}, Wait time {:>3}, Turnaround time {:>3}",
            time, pid, remaining_burst, wait_time, turnaround_time
        ),
        TraceRecord::Idle { time } => format!("T{:<3} : idle", time),
    }
}

pub fn write_header<W: Write>(out: &mut W, policy: &Policy) -> io::Result<()> {
    writeln!(out, "{}", policy)
}

pub fn write_trace_line<W: Write>(out: &mut W, record: &TraceRecord) -> io::Result<()> {
    writeln!(out, "{}", trace_line(record))
}

pub fn write_summary<W: Write>(out: &mut W, summary: &Summary) -> io::Result<()> {
    for metrics in &summary.processes {
        writeln!(out)?;
        writeln!(out, "P{}", metrics.pid)?;
        writeln!(out, "        Waiting time:         {:>3}", metrics.wait_time)?;
        writeln!(out, "        Turnaround time:      {:>3}", metrics.turnaround_time)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Total average waiting time:     {:.1}",
        summary.average_wait_time
    )?;
    writeln!(
        out,
        "Total average turnaround time:  {:.1}",
        summary.average_turnaround_time
    )
}

/// Side-by-side averages, one row per policy.
pub fn write_comparison<W: Write>(out: &mut W, rows: &[(Policy, Summary)]) -> io::Result<()> {
    let width = rows
        .iter()
        .map(|(policy, _)| policy.to_string().len())
        .max()
        .unwrap_or(0)
        .max("Policy".len());

    writeln!(
        out,
        "{:<width$}  {:>12}  {:>18}  {:>8}",
        "Policy", "Average wait", "Average turnaround", "Makespan"
    )?;
    for (policy, summary) in rows {
        writeln!(
            out,
            "{:<width$}  {:>12.2}  {:>18.2}  {:>8}",
            policy.to_string(),
            summary.average_wait_time,
            summary.average_turnaround_time,
            summary.makespan()
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<&'a [TraceRecord]>,
    pub summary: &'a Summary,
}

impl<'a> Report<'a> {
    pub fn new(policy: &Policy, trace: Option<&'a [TraceRecord]>, summary: &'a Summary) -> Self {
        Self {
            policy: policy.to_string(),
            trace,
            summary,
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(report: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
