use super::{
    FirstComeFirstServed, Policy, Process, ProcessRunner, RoundRobinScheduler, RunnerState,
    Scheduler, ShortestJobFirst, TraceRecord,
};
use crate::error::{Result, SimError};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{Clear, ClearType},
};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

enum ReplayEvent {
    Quit,
    Pause,
    Resume,
    Step,
    None,
}

const TICK_RATE: Duration = Duration::from_millis(200);

struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    fn new() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        execute!(io::stdout(), Clear(ClearType::All))?;

        // Set up the input handling thread, it exits once the receiver is gone
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                break;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => break,
                }

                if last_tick.elapsed() >= TICK_RATE {
                    if input_tx.send(DisplayEvent::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    fn draw<S>(
        &mut self,
        policy: &Policy,
        runner: &ProcessRunner<S>,
        last_record: Option<&TraceRecord>,
        paused: bool,
    ) -> io::Result<()>
    where
        S: Scheduler,
    {
        let current_pid = runner.current_process().map(Process::pid);
        let done = runner.state() == RunnerState::Done;

        let status = match last_record {
            Some(TraceRecord::Run {
                time,
                pid,
                remaining_burst,
                wait_time,
                turnaround_time,
                ..
            }) => format!(
                "T{} | P{} | Burst left {} | Wait time {} | Turnaround time {}",
                time, pid, remaining_burst, wait_time, turnaround_time
            ),
            Some(TraceRecord::Idle { time }) => format!("T{} | No process is ready, CPU idle.", time),
            None => "The simulation has not started.".to_owned(),
        };
        let status = if done {
            format!("{} | Finished at T{}, press q to quit.", status, runner.time())
        } else {
            status
        };
        let title = if paused {
            "Current Process (paused: r resume, s step, q quit)"
        } else {
            "Current Process (p pause, q quit)"
        };

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([Constraint::Length(3), Constraint::Min(5)])
                .split(f.size());

            let current = Paragraph::new(status)
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::LightBlue),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_type(BorderType::Rounded),
                );

            f.render_widget(current, chunks[0]);

            let time = runner.time();
            let items = runner.processes().iter().map(|process| {
                let state = if process.is_complete() {
                    "Done"
                } else if Some(process.pid()) == current_pid {
                    "Running"
                } else if process.has_arrived(time) {
                    "Ready"
                } else {
                    "Not arrived"
                };
                let row = Row::new(vec![
                    Cell::from(format!("P{}", process.pid()))
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(process.arrival().to_string()),
                    Cell::from(process.total_burst().to_string()),
                    Cell::from(process.remaining_burst().to_string()),
                    Cell::from(process.wait_time().to_string()),
                    Cell::from(process.turnaround_time().to_string()),
                    Cell::from(state),
                ]);
                if state == "Running" {
                    row.style(Style::default().fg(Color::Yellow))
                } else {
                    row
                }
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec![
                        "PID",
                        "Arrival",
                        "Burst",
                        "Left",
                        "Wait",
                        "Turnaround",
                        "State",
                    ])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(5),
                    Constraint::Length(7),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(5),
                    Constraint::Length(10),
                    Constraint::Length(11),
                ])
                .block(
                    Block::default()
                        .title(policy.to_string())
                        .borders(Borders::ALL),
                )
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, chunks[1]);
        })?;
        Ok(())
    }

    fn get_input(&self) -> ReplayEvent {
        let Ok(event) = self.input_rx.recv() else {
            return ReplayEvent::Quit;
        };
        if let DisplayEvent::Input(key) = event {
            if key.modifiers.is_empty() {
                match key.code {
                    KeyCode::Char('q') => return ReplayEvent::Quit,
                    KeyCode::Char('p') => return ReplayEvent::Pause,
                    KeyCode::Char('r') => return ReplayEvent::Resume,
                    KeyCode::Char('s') => return ReplayEvent::Step,
                    _ => {}
                };
            }
        }
        ReplayEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), Clear(ClearType::All));
    }
}

/// Steps through a simulation in the terminal, one tick per display refresh.
///
/// Returns the process table as it stood when the user quit, which is only
/// complete if the simulation was allowed to finish.
pub fn replay(policy: Policy, processes: Vec<Process>) -> Result<Vec<Process>> {
    policy.validate()?;
    let outcome = match policy {
        Policy::FirstComeFirstServed => replay_with(
            &policy,
            ProcessRunner::new(FirstComeFirstServed::new(), processes),
        ),
        Policy::ShortestJobFirst => {
            replay_with(&policy, ProcessRunner::new(ShortestJobFirst::new(), processes))
        }
        Policy::RoundRobin { quantum } => replay_with(
            &policy,
            ProcessRunner::new(RoundRobinScheduler::new(quantum), processes),
        ),
    };
    outcome.map_err(SimError::Terminal)
}

fn replay_with<S: Scheduler>(
    policy: &Policy,
    mut runner: ProcessRunner<S>,
) -> io::Result<Vec<Process>> {
    let mut terminal = DisplayTerminal::new()?;
    let mut paused = false;
    let mut last_record = None;

    loop {
        if !paused {
            if let Some(record) = runner.step() {
                last_record = Some(record);
            }
        }
        terminal.draw(policy, &runner, last_record.as_ref(), paused)?;

        match terminal.get_input() {
            ReplayEvent::Quit => break,
            ReplayEvent::Pause if !paused => paused = true,
            ReplayEvent::Resume if paused => paused = false,
            ReplayEvent::Step if paused => {
                if let Some(record) = runner.step() {
                    last_record = Some(record);
                }
            }
            _ => {}
        }
    }

    Ok(runner.into_processes())
}
