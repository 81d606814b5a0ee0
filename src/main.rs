mod app;
mod calendar;
mod config;
mod goto;
mod help;
mod host;
mod popup;
mod theme;
use crate::app::App;
use crate::calendar::{parse_date, DatePicker};
use crate::config::{Options, Settings};
use crate::host::StdoutHost;
use anyhow::Context;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stderr};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;

type StderrTerminal = Terminal<CrosstermBackend<Stderr>>;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('f') | Arg::Long("dates-file") => {
                    opts.dates_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('d') | Arg::Long("disabled") => opts.disabled = true,
                Arg::Short('k') | Arg::Long("keep-open") => opts.keep_open = true,
                Arg::Long("today") => {
                    let value = parser.value()?.string()?;
                    match parse_date(&value) {
                        Ok(d) => opts.today = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Value(value) => opts.dates.push(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // The local offset can only be determined while the process
                // is single-threaded, so do this before logging starts.
                let today = match opts.today {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                // Keep the handle alive so that buffered log lines get flushed
                let _logger = match opts.log_file {
                    Some(ref path) => Some(start_logging(path)?),
                    None => None,
                };
                log::info!("today is {today}");
                let settings = Settings::resolve(opts)?;
                let picker =
                    DatePicker::new(today, settings.available).disabled(settings.disabled);
                let app = App::new(picker, StdoutHost::new())
                    .keep_open(settings.keep_open)
                    .nav_color(settings.nav_color);
                let (host, outcome) = with_terminal(|terminal| Ok(app.run(terminal)))?;
                // Deliver held selections even if the event loop failed
                let written = host.finish().context("failed to write selected dates");
                outcome.context("terminal I/O failed")?;
                written?;
                Ok(())
            }
            Command::Help => {
                println!("Usage: calpick [<options>] [YYYY-MM-DD ...]");
                println!();
                println!("Month-paged terminal date picker; selected dates are printed on stdout");
                println!();
                println!("Options:");
                println!("  -c, --config <file>       Read settings from the given TOML file");
                println!("  -f, --dates-file <file>   Read available dates from a file, one per");
                println!("                            line (\"-\" for standard input)");
                println!("  -d, --disabled            Show the calendar without allowing selection");
                println!("  -k, --keep-open           Keep running after a date is selected");
                println!("  --today <YYYY-MM-DD>      Use the given date as today");
                println!("  --log-file <file>         Write log messages to the given file");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn start_logging(path: &Path) -> anyhow::Result<LoggerHandle> {
    let handle = Logger::try_with_env_or_str("info")
        .context("invalid log specification")?
        .log_to_file(FileSpec::try_from(path).context("invalid log file path")?)
        .start()
        .context("failed to start logging")?;
    Ok(handle)
}

/// Run `func` with a terminal drawn on standard error, leaving standard
/// output free for reporting selected dates
fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut StderrTerminal) -> anyhow::Result<T>,
{
    let mut terminal = init_terminal().context("failed to set up terminal")?;
    let r = with_panic_cleanup(restore_terminal, || func(&mut terminal));
    restore_terminal().context("failed to restore terminal")?;
    r
}

/// Run `func` with a panic hook that calls `cleanup` before the previously
/// installed hook, which is put back afterwards
fn with_panic_cleanup<C, F, T>(cleanup: C, func: F) -> T
where
    C: Fn() -> io::Result<()> + Send + Sync + 'static,
    F: FnOnce() -> T,
{
    let prev_hook = Arc::new(panic::take_hook());
    let hook = Arc::clone(&prev_hook);
    panic::set_hook(Box::new(move |info| {
        let _ = cleanup();
        (*hook)(info);
    }));
    let r = func();
    // Dropping our hook releases its handle on the previous one
    drop(panic::take_hook());
    if let Ok(prev) = Arc::try_unwrap(prev_hook) {
        panic::set_hook(prev);
    }
    r
}

fn init_terminal() -> io::Result<StderrTerminal> {
    enable_raw_mode()?;
    undo_on_err(setup_terminal(), restore_terminal)
}

fn setup_terminal() -> io::Result<StderrTerminal> {
    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stderr))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Call `undo` if `r` is an error.  Errors from `undo` itself are ignored in
/// favor of the original one.
fn undo_on_err<T, U>(r: io::Result<T>, undo: U) -> io::Result<T>
where
    U: FnOnce() -> io::Result<()>,
{
    if r.is_err() {
        let _ = undo();
    }
    r
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture, Show)?;
    Ok(())
}
