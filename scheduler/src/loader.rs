//! Reads process lists from text files.
//!
//! One process per line, in arrival order: `P<id>,<burst>[,<arrival>]`.
//! The `P` prefix is optional, blank lines and `#` comments are skipped.

use crate::error::{Result, SimError};
use crate::scheduler::ProcessSpec;
use std::fs;
use std::path::Path;

pub fn load_processes(path: impl AsRef<Path>) -> Result<Vec<ProcessSpec>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_processes(&contents)
}

pub fn parse_processes(contents: &str) -> Result<Vec<ProcessSpec>> {
    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)| parse_line(line_number, line))
        .collect()
}

fn parse_line(line_number: usize, line: &str) -> Result<ProcessSpec> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let (pid, burst, arrival) = match fields.as_slice() {
        [pid, burst] => (*pid, *burst, None),
        [pid, burst, arrival] => (*pid, *burst, Some(*arrival)),
        _ => {
            return Err(SimError::parse(
                line_number,
                format!("expected `P<id>,<burst>[,<arrival>]`, found {:?}", line),
            ))
        }
    };

    let pid = pid
        .strip_prefix(|c: char| c == 'P' || c == 'p')
        .unwrap_or(pid)
        .parse::<u32>()
        .map_err(|_| SimError::parse(line_number, format!("invalid process id {:?}", pid)))?;
    let burst = parse_number(line_number, "burst time", burst)?;

    Ok(match arrival {
        Some(arrival) => {
            ProcessSpec::arriving_at(pid, burst, parse_number(line_number, "arrival time", arrival)?)
        }
        None => ProcessSpec::new(pid, burst),
    })
}

fn parse_number(line_number: usize, what: &str, field: &str) -> Result<u64> {
    field.parse::<u64>().map_err(|_| {
        SimError::parse(
            line_number,
            format!("{} must be a non-negative integer, found {:?}", what, field),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_classic_format() {
        let specs = parse_processes("P1,5\nP2,3\nP3,8\n").unwrap();
        assert_eq!(
            specs,
            vec![
                ProcessSpec::new(1, 5),
                ProcessSpec::new(2, 3),
                ProcessSpec::new(3, 8)
            ]
        );
    }

    #[test]
    fn tolerates_whitespace_comments_and_bare_ids() {
        let specs = parse_processes("# pid,burst\n\n  4 , 2 \r\nP7,1,3\n").unwrap();
        assert_eq!(
            specs,
            vec![ProcessSpec::new(4, 2), ProcessSpec::arriving_at(7, 1, 3)]
        );
    }

    #[test]
    fn reports_the_offending_line() {
        let err = parse_processes("P1,5\n\nP2,-3\n").unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 3, .. }), "{err}");

        let err = parse_processes("P1\n").unwrap_err();
        assert!(matches!(err, SimError::Parse { line: 1, .. }), "{err}");

        let err = parse_processes("Q1,2\n").unwrap_err();
        assert!(err.to_string().contains("invalid process id"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_processes("/nonexistent/schedule.csv").unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }
}
