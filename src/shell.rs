//! Line-oriented command interpreter driving an [`FsBackend`].
//!
//! Each line holds a command keyword and at most one argument:
//!
//! ```text
//! mkdir docs
//! cd docs
//! touch note.txt
//! ls
//! pwd
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. A failing command is reported on
//! the error writer as `<command>: <reason>` and the interpreter goes on with the next line.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{FsBackend, FsError};
use crate::vfs::Cursor;

/// What the interpreter does after a command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{command}: {source}")]
    Fs {
        command: String,
        #[source]
        source: FsError,
    },

    #[error("{0}: command not found")]
    UnknownCommand(String),

    #[error("{0}: too many arguments")]
    TooManyArguments(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Shell<B: FsBackend, W: Write, E: Write> {
    fs: B,
    cursor: Option<Cursor>,
    out: W,
    err: E,
    echo: bool,
}

impl<B: FsBackend, W: Write, E: Write> Shell<B, W, E> {
    /// Mounts a namespace on `fs` and positions the shell at its root.
    /// Listings and paths go to `out`, failure messages to `err`.
    pub fn new(mut fs: B, out: W, err: E) -> Result<Self, ShellError> {
        let cursor = fs.mkfs().map_err(|source| ShellError::Fs {
            command: "mkfs".to_string(),
            source,
        })?;
        Ok(Self {
            fs,
            cursor: Some(cursor),
            out,
            err,
            echo: false,
        })
    }

    /// If set, every dispatched command is written to `out` (prefixed with `> `) before it runs.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn fs(&self) -> &B {
        &self.fs
    }

    /// `None` after `rmfs` until the next `mkfs`.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor
    }

    pub fn out(&self) -> &W {
        &self.out
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    /// Executes a single command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow, ShellError> {
        let mut tokens = line.split_whitespace();
        let command = match tokens.next() {
            Some(command) if !command.starts_with('#') => command,
            _ => return Ok(Flow::Continue),
        };
        if self.echo {
            writeln!(self.out, "> {}", line.trim())?;
        }
        let arg = tokens.next().unwrap_or("");
        if tokens.next().is_some() {
            return Err(ShellError::TooManyArguments(command.to_string()));
        }
        debug!(command, arg, "dispatching");

        let fs_error = |source| ShellError::Fs {
            command: command.to_string(),
            source,
        };

        match command {
            "mkfs" | "pwd" | "rmfs" | "exit" | "quit" if !arg.is_empty() => {
                return Err(ShellError::TooManyArguments(command.to_string()));
            }
            "exit" | "quit" => return Ok(Flow::Exit),
            "mkfs" => {
                self.cursor = Some(self.fs.mkfs().map_err(fs_error)?);
            }
            "touch" => {
                let cursor = self.current().map_err(fs_error)?;
                self.fs.touch(cursor, arg).map_err(fs_error)?;
            }
            "mkdir" => {
                let cursor = self.current().map_err(fs_error)?;
                self.fs.mkdir(cursor, arg).map_err(fs_error)?;
            }
            "cd" => {
                let cursor = self.current().map_err(fs_error)?;
                self.cursor = Some(self.fs.cd(cursor, arg).map_err(fs_error)?);
            }
            "ls" => {
                let cursor = self.current().map_err(fs_error)?;
                let listing = self.fs.ls(cursor, arg).map_err(fs_error)?;
                write!(self.out, "{}", listing)?;
            }
            "pwd" => {
                let cursor = self.current().map_err(fs_error)?;
                let path = self.fs.pwd(cursor).map_err(fs_error)?;
                writeln!(self.out, "{}", path)?;
            }
            "rm" => {
                let cursor = self.current().map_err(fs_error)?;
                self.fs.rm(cursor, arg).map_err(fs_error)?;
            }
            "rmfs" => {
                let cursor = self.current().map_err(fs_error)?;
                self.fs.rmfs(cursor).map_err(fs_error)?;
                self.cursor = None;
            }
            _ => return Err(ShellError::UnknownCommand(command.to_string())),
        }
        Ok(Flow::Continue)
    }

    /// Executes every line of `reader` until it is exhausted or `exit` is read.
    /// Returns the number of failed commands.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<usize, ShellError> {
        let mut failures = 0;
        for line in reader.lines() {
            let line = line?;
            match self.execute(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(ShellError::Io(e)) => return Err(ShellError::Io(e)),
                Err(e) => {
                    warn!("{}", e);
                    writeln!(self.err, "{}", e)?;
                    failures += 1;
                }
            }
        }
        Ok(failures)
    }

    /// Executes a script file. See `run()`.
    pub fn run_script<P: AsRef<Path>>(&mut self, path: P) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("cannot open script {}", path.display()))?;
        let failures = self
            .run(BufReader::new(file))
            .with_context(|| format!("failed to run script {}", path.display()))?;
        Ok(failures)
    }

    fn current(&self) -> crate::core::Result<Cursor> {
        self.cursor.ok_or(FsError::Unmounted)
    }
}
