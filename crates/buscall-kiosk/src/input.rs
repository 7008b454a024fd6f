//! Digital input sources for the call button.

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{KioskError, Result};

/// Root of the Linux GPIO sysfs interface.
pub const DEFAULT_GPIO_ROOT: &str = "/sys/class/gpio";

/// GPIO line the call button is wired to.
pub const DEFAULT_BUTTON_PIN: u32 = 76;

/// A single digital input line.
///
/// `read` returns `true` while the button is pressed.
pub trait DigitalInputSource {
    /// Configure the line. Called once before the first `read`.
    fn initialize(&mut self) -> Result<()>;

    /// Sample the current level.
    fn read(&mut self) -> Result<bool>;

    /// Line name for diagnostics.
    fn line(&self) -> String;
}

/// GPIO line exposed through the sysfs interface.
#[derive(Debug, Clone)]
pub struct SysfsInput {
    root: PathBuf,
    pin: u32,
}

impl SysfsInput {
    /// Button line `pin` under a sysfs tree such as [`DEFAULT_GPIO_ROOT`].
    pub fn with_root(root: impl AsRef<Path>, pin: u32) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            pin,
        }
    }

    fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    fn input_error(&self, source: std::io::Error) -> KioskError {
        KioskError::Input {
            line: self.line(),
            source,
        }
    }

    fn export(&self) -> Result<()> {
        let export = self.root.join("export");
        let result = OpenOptions::new()
            .write(true)
            .open(&export)
            .and_then(|mut file| file.write_all(self.pin.to_string().as_bytes()));
        match result {
            Ok(()) => {
                debug!(pin = self.pin, "exported gpio line");
                Ok(())
            }
            Err(err) if is_busy(&err) => {
                debug!(pin = self.pin, "gpio line already exported");
                Ok(())
            }
            Err(err) => Err(self.input_error(err)),
        }
    }
}

impl DigitalInputSource for SysfsInput {
    fn initialize(&mut self) -> Result<()> {
        if !self.pin_dir().exists() {
            self.export()?;
        }

        OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(self.pin_dir().join("direction"))
            .and_then(|mut file| file.write_all(b"in"))
            .map_err(|err| self.input_error(err))?;

        info!(line = %self.line(), "configured button input");
        Ok(())
    }

    fn read(&mut self) -> Result<bool> {
        let raw =
            std::fs::read(self.pin_dir().join("value")).map_err(|err| self.input_error(err))?;
        Ok(parse_level(&raw))
    }

    fn line(&self) -> String {
        format!("gpio{}", self.pin)
    }
}

/// Interpret a sysfs `value` file: leading decimal digits, nonzero is high.
fn parse_level(raw: &[u8]) -> bool {
    raw.iter()
        .take_while(|b| b.is_ascii_digit())
        .any(|b| *b != b'0')
}

#[cfg(unix)]
fn is_busy(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(libc::EBUSY)
}

#[cfg(not(unix))]
fn is_busy(_err: &std::io::Error) -> bool {
    false
}

/// Input that replays a fixed sequence of levels.
///
/// Once the sequence is exhausted every `read` fails, which ends a monitor
/// loop the same way a vanished GPIO line would.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    levels: VecDeque<bool>,
    initialized: bool,
    reads: usize,
}

impl ScriptedInput {
    pub fn new(levels: impl IntoIterator<Item = bool>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            initialized: false,
            reads: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of successful reads so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl DigitalInputSource for ScriptedInput {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn read(&mut self) -> Result<bool> {
        let level = self.levels.pop_front().ok_or_else(|| KioskError::Input {
            line: self.line(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "script exhausted"),
        })?;
        self.reads += 1;
        Ok(level)
    }

    fn line(&self) -> String {
        "scripted".to_string()
    }
}
