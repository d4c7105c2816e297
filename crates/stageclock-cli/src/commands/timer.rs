use std::io::Write;

use clap::{Args, Subcommand};
use stageclock_core::{
    format_hms, parse_time_input, Clock, CompletionNotifier, Config, Database, Event, SoundLibrary,
    TickScheduler, TimerEngine, TimerState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::audio::Audio;
use crate::host::TerminalHost;

const MINUTE_MS: i64 = 60_000;
const HALF_MINUTE_MS: i64 = 30_000;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown in the foreground, reading commands from stdin
    ///
    /// Commands (one per line): space or t toggle, s start, p pause,
    /// r reset, R toggle repeat, + / - one minute, ] / [ thirty seconds,
    /// "set <time>" new duration, q quit.
    Run(RunArgs),
    /// Parse a duration ("5", "1:30", "1:02:03") and print it
    Parse {
        input: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Duration to load; defaults to timer.default_duration_secs
    #[arg(short, long)]
    duration: Option<String>,
    /// Start counting immediately
    #[arg(short, long)]
    start: bool,
    /// Repeat for this run, ignoring the saved setting
    #[arg(long, conflicts_with = "no_repeat")]
    repeat: bool,
    /// Do not repeat for this run, ignoring the saved setting
    #[arg(long)]
    no_repeat: bool,
    /// Print events as JSON lines instead of the live display
    #[arg(long)]
    json: bool,
    /// Exit as soon as the countdown first reaches zero
    #[arg(long)]
    exit_on_complete: bool,
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run(args) => run_countdown(args).await,
        TimerAction::Parse { input, json } => {
            let ms = parse_time_input(&input)?;
            if json {
                let out = serde_json::json!({ "ms": ms, "hms": format_hms(ms) });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{ms}\t{}", format_hms(ms));
            }
            Ok(())
        }
    }
}

async fn run_countdown(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    // The countdown runs without persistence when the store is unavailable.
    let db = Database::open()
        .map_err(|e| tracing::warn!(error = %e, "repeat flag will not be saved"))
        .ok();

    let total_ms = match &args.duration {
        Some(raw) => parse_time_input(raw)?,
        None => config.default_duration_ms(),
    };
    let repeat = if args.repeat {
        true
    } else if args.no_repeat {
        false
    } else {
        db.as_ref().is_some_and(Database::load_repeat)
    };

    let sounds = SoundLibrary::new();
    let sources = config.sound_sources();
    if !sources.is_empty() {
        let library = sounds.clone();
        tokio::spawn(async move {
            let loaded = library.preload(sources).await;
            tracing::debug!(loaded, "custom sounds ready");
        });
    }

    let notifier = CompletionNotifier::new(sounds, Audio::detect(), TerminalHost::detect());
    let mut engine = TimerEngine::new(notifier)
        .with_duration_ms(total_ms)
        .with_repeat(repeat)
        .with_preferences(config.preferences.clone());
    let mut scheduler = TickScheduler::new(config.tick_interval());
    let mut printer = Printer::new(args.json);

    printer.event(&engine.snapshot());
    if args.start {
        if let Some(event) = engine.start() {
            printer.event(&event);
        }
    }
    printer.status(&engine);
    scheduler.sync(engine.is_running());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = scheduler.tick() => {
                let events = engine.tick();
                let completed = events.iter().any(|e| matches!(e, Event::TimerCompleted { .. }));
                for event in &events {
                    printer.event(event);
                }
                printer.status(&engine);
                if completed && args.exit_on_complete {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if let Flow::Quit = handle_line(&line, &mut engine, db.as_ref(), &mut printer) {
                        break;
                    }
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }

        scheduler.sync(engine.is_running());
        if !stdin_open && !engine.is_running() {
            break;
        }
    }

    printer.finish(&engine);
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn handle_line<C: Clock>(
    line: &str,
    engine: &mut TimerEngine<C>,
    db: Option<&Database>,
    printer: &mut Printer,
) -> Flow {
    let command = if line.trim().is_empty() && !line.is_empty() {
        " "
    } else {
        line.trim()
    };

    let event = match command {
        "" => None,
        " " | "t" => engine.toggle(),
        "s" => engine.start(),
        "p" => engine.pause(),
        "r" => engine.reset(),
        "R" => {
            let next = !engine.repeat();
            if let Some(Err(e)) = db.map(|db| db.save_repeat(next)) {
                tracing::warn!(error = %e, "could not save repeat flag");
            }
            engine.set_repeat(next)
        }
        "+" => engine.adjust_by(MINUTE_MS),
        "-" => engine.adjust_by(-MINUTE_MS),
        "]" => engine.adjust_by(HALF_MINUTE_MS),
        "[" => engine.adjust_by(-HALF_MINUTE_MS),
        "q" => return Flow::Quit,
        other => match other.strip_prefix("set ") {
            Some(input) => match engine.apply_time_input(input) {
                Ok(event) => event,
                Err(e) => {
                    printer.notice(&format!("invalid time: {e}"));
                    None
                }
            },
            None => {
                printer.notice(&format!("unknown command: {other}"));
                None
            }
        },
    };

    if let Some(event) = event {
        printer.event(&event);
    }
    printer.status(engine);
    Flow::Continue
}

/// Renders either JSON event lines or a single live status line.
struct Printer {
    json: bool,
    last_status: Option<String>,
}

impl Printer {
    fn new(json: bool) -> Self {
        Self {
            json,
            last_status: None,
        }
    }

    fn event(&mut self, event: &Event) {
        if !self.json {
            return;
        }
        match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, kind = event.kind(), "could not serialize event"),
        }
    }

    fn status<C: Clock>(&mut self, engine: &TimerEngine<C>) {
        if self.json {
            return;
        }
        let line = status_line(engine);
        if self.last_status.as_deref() == Some(line.as_str()) {
            return;
        }
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "\r\x1b[2K{line}");
        let _ = stdout.flush();
        self.last_status = Some(line);
    }

    fn notice(&mut self, message: &str) {
        if self.last_status.take().is_some() {
            println!();
        }
        eprintln!("{message}");
    }

    fn finish<C: Clock>(&mut self, engine: &TimerEngine<C>) {
        if self.json {
            self.event(&engine.snapshot());
        } else if self.last_status.is_some() {
            println!();
        }
    }
}

fn status_line<C: Clock>(engine: &TimerEngine<C>) -> String {
    let mut line = engine.display().to_string();
    match engine.state() {
        TimerState::Paused => line.push_str("  paused"),
        TimerState::Completed => line.push_str("  done"),
        TimerState::Overtime => line.push_str("  overtime"),
        TimerState::Idle | TimerState::Running => {}
    }
    if engine.repeat() {
        line.push_str("  repeat");
    }
    line
}
