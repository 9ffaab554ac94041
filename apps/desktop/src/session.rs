//! Terminal presentation of the classification form.
//!
//! The session owns the only [`FormController`]. Uploads run as spawned
//! tasks and report back over a channel, so every state change happens on
//! the session loop.

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use client_core::{Effect, FormController, FormEvent, SelectedImage};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};
use tracing::debug;

use crate::commands::{parse_command, ParseError, UiCommand, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Session<W: Write> {
    controller: FormController,
    /// What the file picker currently shows; cleared by a reset effect.
    file_input: Option<PathBuf>,
    out: W,
    completions_tx: mpsc::UnboundedSender<FormEvent>,
    completions_rx: mpsc::UnboundedReceiver<FormEvent>,
    in_flight: usize,
}

impl<W: Write> Session<W> {
    pub fn new(controller: FormController, out: W) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            file_input: None,
            out,
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn file_input(&self) -> Option<&PathBuf> {
        self.file_input.as_ref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads commands until `quit`, or until input ends and every
    /// outstanding upload has reported back.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;
        self.prompt()?;

        loop {
            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line.context("failed to read command input")? {
                        Some(line) => {
                            if self.handle_line(&line).await? == Flow::Quit {
                                break;
                            }
                            self.prompt()?;
                        }
                        None => input_open = false,
                    }
                }
                Some(completion) = self.completions_rx.recv(), if self.in_flight > 0 => {
                    self.in_flight -= 1;
                    self.apply(completion)?;
                }
            }

            if !input_open && self.in_flight == 0 {
                break;
            }
        }

        if self.in_flight > 0 {
            debug!(in_flight = self.in_flight, "leaving with uploads outstanding");
        }
        self.out.flush()?;
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let command = match parse_command(line) {
            Ok(command) => command,
            Err(ParseError::Empty) => return Ok(Flow::Continue),
            Err(ParseError::MissingPath) => {
                writeln!(self.out, "error: select needs a file path")?;
                return Ok(Flow::Continue);
            }
            Err(ParseError::Unknown(verb)) => {
                writeln!(self.out, "error: unknown command '{verb}' (try 'help')")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            UiCommand::Select(path) => match SelectedImage::from_path(&path).await {
                Ok(image) => {
                    let effects = self.controller.select(image);
                    self.file_input = Some(path);
                    self.run_effects(effects)?;
                    self.print_file()?;
                }
                Err(err) => writeln!(self.out, "error: {err:#}")?,
            },
            UiCommand::Remove => {
                if self.controller.state().can_remove() {
                    let effects = self.controller.remove();
                    self.run_effects(effects)?;
                    writeln!(self.out, "image removed")?;
                } else {
                    writeln!(self.out, "no image selected")?;
                }
            }
            UiCommand::Submit => {
                let effects = self.controller.handle(FormEvent::SubmitRequested);
                self.run_effects(effects)?;
            }
            UiCommand::Status => {
                self.print_file()?;
                self.print_result()?;
            }
            UiCommand::Help => writeln!(self.out, "{HELP}")?,
            UiCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply(&mut self, event: FormEvent) -> Result<()> {
        let answers_latest = match &event {
            FormEvent::SubmissionCompleted { ticket, .. } => {
                self.controller.state().awaiting() == Some(*ticket)
            }
            _ => false,
        };
        let effects = self.controller.handle(event);
        self.run_effects(effects)?;
        if answers_latest {
            self.print_result()?;
        }
        Ok(())
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::Warn(message) => writeln!(self.out, "warning: {message}")?,
                Effect::ResetFileInput => self.file_input = None,
                Effect::Dispatch(pending) => {
                    writeln!(self.out, "classifying {} ...", pending.image.file_name())?;
                    let transport = self.controller.transport();
                    let completions = self.completions_tx.clone();
                    self.in_flight += 1;
                    tokio::spawn(async move {
                        let completion = pending.send(transport).await;
                        let _ = completions.send(completion);
                    });
                }
            }
        }
        Ok(())
    }

    fn print_file(&mut self) -> Result<()> {
        match self.controller.state().file() {
            Some(image) => writeln!(
                self.out,
                "selected: {} ({}, {} bytes)",
                image.file_name(),
                image.mime_type(),
                image.len()
            )?,
            None => writeln!(self.out, "selected: none")?,
        }
        Ok(())
    }

    fn print_result(&mut self) -> Result<()> {
        if let Some(text) = self.controller.state().result().display_text() {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    fn prompt(&mut self) -> Result<()> {
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
