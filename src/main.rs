// src/main.rs
//! Live terminal dashboard for the unipark parking simulator.
//!
//! Boots the engine with its default campus layout, runs the simulated
//! traffic and renders the zone counters in an alternate-screen crossterm
//! UI. Commands are typed straight into the dashboard prompt.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use time::OffsetDateTime;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use unipark_engine::zone::{SystemTotals, ZoneRegistry, ZoneSnapshot};
use unipark_engine::{
    CommandOutcome, CommandProcessor, EngineEvent, UniparkEngine, ZoneOutcome,
};

/// How long the input poll waits before the next repaint.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Number of activity lines kept on screen.
const FEED_LINES: usize = 8;

/// Width of the occupancy bar, in cells.
const BAR_WIDTH: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut engine = UniparkEngine::new(None)?;
    let registry = engine.registry();

    print_banner(&registry);
    wait_for_enter()?;

    // Subscribe before starting so the dashboard sees the start marker and
    // every piece of traffic after it.
    let dashboard = Dashboard::new(
        registry,
        engine.command_processor(),
        engine.subscribe_events(),
    );
    engine.start()?;

    // The crossterm loop blocks, so it gets a dedicated thread while the
    // traffic workers keep running on the runtime.
    let ui_result = tokio::task::spawn_blocking(move || dashboard.run()).await;

    engine.shutdown().await?;

    match ui_result {
        Ok(result) => result?,
        Err(join_err) => eprintln!("dashboard thread panicked: {join_err}"),
    }

    println!("Simulation stopped. Goodbye.");
    Ok(())
}

fn print_banner(registry: &ZoneRegistry) {
    println!("UNIPARK, the university parking simulator");
    println!();
    println!("Zones on duty:");
    for zone in registry.all() {
        println!(
            "  [{}] {:<16} {} slots",
            zone.key(),
            zone.name(),
            zone.capacity()
        );
    }
    println!();
    println!("Dashboard commands: park <zone> | unpark <zone> | exit");
    println!("Press ENTER to start the live dashboard...");
}

fn wait_for_enter() -> anyhow::Result<()> {
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(())
}

/// Interactive alternate-screen view over the engine: zone cards, campus
/// totals, an activity feed and a command prompt.
struct Dashboard {
    registry: Arc<ZoneRegistry>,
    processor: CommandProcessor,
    events: broadcast::Receiver<EngineEvent>,
    feed: VecDeque<String>,
    input: String,
    feedback: Option<String>,
}

impl Dashboard {
    fn new(
        registry: Arc<ZoneRegistry>,
        processor: CommandProcessor,
        events: broadcast::Receiver<EngineEvent>,
    ) -> Self {
        Self {
            registry,
            processor,
            events,
            feed: VecDeque::with_capacity(FEED_LINES),
            input: String::new(),
            feedback: None,
        }
    }

    /// Run the dashboard until the user quits. Raw mode and the alternate
    /// screen are restored even when the loop errors out.
    fn run(mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let result = self.event_loop(&mut stdout);

        execute!(stdout, Show, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
        result
    }

    fn event_loop(&mut self, stdout: &mut Stdout) -> anyhow::Result<()> {
        loop {
            self.drain_events();
            self.paint(stdout)?;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Pull pending engine events into the activity feed without blocking.
    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    let line = feed_line(&event);
                    self.push_feed(line);
                }
                Err(TryRecvError::Lagged(missed)) => {
                    self.push_feed(format!(
                        "[{}] feed lagging, skipped {missed} events",
                        timestamp()
                    ));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }

    fn push_feed(&mut self, line: String) {
        if self.feed.len() == FEED_LINES {
            self.feed.pop_front();
        }
        self.feed.push_back(line);
    }

    /// Returns true when the dashboard should close.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Esc => true,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
                false
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                false
            }
            _ => false,
        }
    }

    fn submit(&mut self) -> bool {
        let line = std::mem::take(&mut self.input);
        match self.processor.process(&line) {
            Ok(CommandOutcome::Exit) => return true,
            Ok(CommandOutcome::Noop) => self.feedback = None,
            Ok(CommandOutcome::Zone {
                outcome, snapshot, ..
            }) => {
                self.feedback = Some(describe_outcome(&snapshot, outcome));
            }
            Err(err) => self.feedback = Some(format!("error: {err}")),
        }
        false
    }

    fn paint(&self, stdout: &mut Stdout) -> anyhow::Result<()> {
        queue!(stdout, MoveTo(0, 0), Clear(ClearType::All))?;

        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            Print("UNIPARK LIVE DASHBOARD\r\n"),
            SetAttribute(Attribute::Reset),
            Print("\r\n"),
        )?;

        let snapshots = self.registry.snapshot_all();
        for snapshot in &snapshots {
            let (label, color) = status_label(snapshot.rate);
            queue!(
                stdout,
                Print(format!("{:<24}", snapshot.name)),
                SetForegroundColor(color),
                Print(format!("[{label}]")),
                ResetColor,
                Print("\r\n"),
            )?;
            queue!(
                stdout,
                Print(format!(
                    "  {}  free {:>3}/{:<3}  waiting {}\r\n",
                    occupancy_bar(snapshot),
                    snapshot.free_slots,
                    snapshot.capacity,
                    snapshot.waiting
                )),
                Print("\r\n"),
            )?;
        }

        let totals = SystemTotals::from_snapshots(&snapshots);
        queue!(
            stdout,
            Print(format!(
                "campus: {} occupied / {} capacity, {} waiting\r\n",
                totals.occupied, totals.capacity, totals.waiting
            )),
            Print("\r\n"),
        )?;

        queue!(stdout, Print("recent activity:\r\n"))?;
        for line in &self.feed {
            queue!(stdout, Print(format!("  {line}\r\n")))?;
        }
        for _ in self.feed.len()..FEED_LINES {
            queue!(stdout, Print("\r\n"))?;
        }

        queue!(stdout, Print("\r\n"))?;
        match &self.feedback {
            Some(feedback) => queue!(stdout, Print(format!("{feedback}\r\n")))?,
            None => queue!(stdout, Print("\r\n"))?,
        }

        queue!(
            stdout,
            Print(format!("> {}█\r\n", self.input)),
            Print("commands: park <zone> | unpark <zone> | exit   (Esc quits)\r\n"),
        )?;

        stdout.flush()?;
        Ok(())
    }
}

// ---------- Rendering helpers ----------

/// Map an occupancy rate to the card label and its color.
fn status_label(rate: f64) -> (&'static str, Color) {
    if rate > 95.0 {
        ("FULL", Color::Red)
    } else if rate > 70.0 {
        ("BUSY", Color::Yellow)
    } else {
        ("FREE", Color::Green)
    }
}

/// Fixed-width occupancy bar, filled left to right.
fn occupancy_bar(snapshot: &ZoneSnapshot) -> String {
    let filled = if snapshot.capacity == 0 {
        0
    } else {
        (snapshot.occupied as usize * BAR_WIDTH) / snapshot.capacity as usize
    };

    let mut bar = String::with_capacity(BAR_WIDTH * '█'.len_utf8());
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '█' } else { '░' });
    }
    bar
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
}

/// One feed line per engine event.
fn feed_line(event: &EngineEvent) -> String {
    match event {
        EngineEvent::EngineStarted => format!("[{}] simulation started", timestamp()),
        EngineEvent::EngineShutdown { reason } => {
            format!("[{}] shutting down: {reason}", timestamp())
        }
        EngineEvent::ZoneActivity {
            source,
            outcome,
            snapshot,
            ..
        } => {
            let what = match outcome {
                ZoneOutcome::Admitted => "parked a vehicle in",
                ZoneOutcome::Queued => "queued a vehicle for",
                ZoneOutcome::Released => "released a vehicle from",
                ZoneOutcome::AlreadyEmpty => "found nothing to release in",
            };
            format!(
                "[{}] {source} {what} {} (free {}/{}, waiting {})",
                timestamp(),
                snapshot.name,
                snapshot.free_slots,
                snapshot.capacity,
                snapshot.waiting
            )
        }
    }
}

/// Prompt feedback for a manual command.
fn describe_outcome(snapshot: &ZoneSnapshot, outcome: ZoneOutcome) -> String {
    match outcome {
        ZoneOutcome::Admitted => format!("{}: vehicle admitted", snapshot.name),
        ZoneOutcome::Queued => format!("{}: zone full, vehicle queued", snapshot.name),
        ZoneOutcome::Released => format!("{}: vehicle released", snapshot.name),
        ZoneOutcome::AlreadyEmpty => format!("{}: zone already empty", snapshot.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unipark_engine::ActionSource;

    fn snap(capacity: u32, free_slots: u32, waiting: u32) -> ZoneSnapshot {
        let occupied = capacity - free_slots;
        let rate = if capacity == 0 {
            0.0
        } else {
            f64::from(occupied) * 100.0 / f64::from(capacity)
        };
        ZoneSnapshot {
            name: "Test Zone".to_string(),
            capacity,
            free_slots,
            occupied,
            waiting,
            rate,
        }
    }

    #[test]
    fn labels_follow_the_occupancy_thresholds() {
        assert_eq!(status_label(0.0).0, "FREE");
        assert_eq!(status_label(70.0).0, "FREE");
        assert_eq!(status_label(70.1).0, "BUSY");
        assert_eq!(status_label(95.0).0, "BUSY");
        assert_eq!(status_label(95.1).0, "FULL");
        assert_eq!(status_label(100.0).0, "FULL");
    }

    #[test]
    fn bar_is_empty_for_an_empty_zone() {
        let bar = occupancy_bar(&snap(20, 20, 0));
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn bar_is_solid_for_a_full_zone() {
        let bar = occupancy_bar(&snap(20, 0, 3));
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), BAR_WIDTH);
    }

    #[test]
    fn bar_handles_a_zero_capacity_zone() {
        let bar = occupancy_bar(&snap(0, 0, 0));
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 0);
        assert_eq!(bar.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn feed_lines_name_the_zone_and_the_action() {
        let event = EngineEvent::ZoneActivity {
            zone: "a".into(),
            source: ActionSource::Traffic,
            outcome: ZoneOutcome::Admitted,
            snapshot: snap(60, 39, 0),
        };

        let line = feed_line(&event);
        assert!(line.contains("traffic parked a vehicle in Test Zone"));
        assert!(line.contains("free 39/60"));
    }

    #[test]
    fn manual_feedback_describes_the_outcome() {
        let snapshot = snap(45, 0, 2);
        let line = describe_outcome(&snapshot, ZoneOutcome::Queued);
        assert_eq!(line, "Test Zone: zone full, vehicle queued");
    }
}
