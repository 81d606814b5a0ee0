use std::io::{self, IsTerminal, Write};

/// The program that launched the picker and receives its selections
pub(crate) trait Host {
    /// Report a selected date, formatted as `YYYY-MM-DD`
    fn set_value(&mut self, value: &str) -> io::Result<()>;
}

/// Reports selections on standard output, one per line.
///
/// The calendar is drawn on standard error, so when standard output is
/// redirected each value is written as soon as it is selected.  When standard
/// output is the same terminal as the calendar, values are held back until
/// [`StdoutHost::finish()`] is called after the terminal has been restored.
#[derive(Debug)]
pub(crate) struct StdoutHost<W> {
    out: W,
    stream: bool,
    pending: Vec<String>,
}

impl StdoutHost<io::Stdout> {
    pub(crate) fn new() -> Self {
        let out = io::stdout();
        let stream = !out.is_terminal();
        StdoutHost::with_writer(out, stream)
    }
}

impl<W: Write> StdoutHost<W> {
    pub(crate) fn with_writer(out: W, stream: bool) -> Self {
        StdoutHost {
            out,
            stream,
            pending: Vec::new(),
        }
    }

    fn emit(&mut self, value: &str) -> io::Result<()> {
        writeln!(self.out, "{value}")?;
        self.out.flush()
    }

    /// Write out any held-back values
    pub(crate) fn finish(mut self) -> io::Result<W> {
        for value in std::mem::take(&mut self.pending) {
            self.emit(&value)?;
        }
        Ok(self.out)
    }
}

impl<W: Write> Host for StdoutHost<W> {
    fn set_value(&mut self, value: &str) -> io::Result<()> {
        if self.stream {
            self.emit(value)
        } else {
            self.pending.push(value.to_owned());
            Ok(())
        }
    }
}

#[cfg(test)]
impl Host for Vec<String> {
    fn set_value(&mut self, value: &str) -> io::Result<()> {
        self.push(value.to_owned());
        Ok(())
    }
}
