//! Driving an engine child process.

use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::analysis::Analysis;
use crate::command::EngineCommand;
use crate::config::AnalysisConfig;
use crate::error::UciError;
use crate::info::{EngineLine, parse_engine_line};

/// How long to wait for `uciok` and `readyok`.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Extra time granted past the search limit before sending `stop`, and again
/// after it before giving up on `bestmove`.
const GRACE: Duration = Duration::from_millis(2000);

/// How long `quit` may take before the process is killed.
const QUIT_TIMEOUT: Duration = Duration::from_millis(500);

/// Events forwarded by the stdout reader thread.
enum EngineEvent {
    Line(String),
    OutputClosed,
}

/// A running UCI engine.
///
/// Output is read on a dedicated thread and forwarded over a channel, so
/// every wait here has a deadline. Dropping the handle sends `quit` and
/// reaps the process.
pub struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    events: Receiver<EngineEvent>,
    reader: Option<JoinHandle<()>>,
    name: Option<String>,
}

impl EngineProcess {
    /// Start `program` and complete the `uci` handshake.
    pub fn spawn<S: AsRef<OsStr>>(program: S, args: &[String]) -> Result<Self, UciError> {
        let engine_display = program.as_ref().to_string_lossy().into_owned();
        let mut child = Command::new(program.as_ref())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| UciError::Spawn {
                engine: engine_display.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(UciError::EngineExited);
        };

        let (tx, rx) = mpsc::channel::<EngineEvent>();
        let reader = thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => {
                        if tx.send(EngineEvent::Line(line)).is_err() {
                            return;
                        }
                    }
                    Err(_) => break,
                }
            }
            let _ = tx.send(EngineEvent::OutputClosed);
        });

        info!(engine = %engine_display, pid = child.id(), "engine started");
        let mut engine = Self {
            child,
            stdin,
            events: rx,
            reader: Some(reader),
            name: None,
        };
        engine.handshake()?;
        Ok(engine)
    }

    /// Spawn the engine named in `config` and apply its options.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, UciError> {
        let mut engine = Self::spawn(&config.engine_path, &config.engine_args)?;
        for option in config.engine_options() {
            engine.send(&option)?;
        }
        engine.wait_ready()?;
        Ok(engine)
    }

    /// The name from `id name`, once the handshake is done.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Write one command line.
    pub fn send(&mut self, command: &EngineCommand) -> Result<(), UciError> {
        debug!(%command, "sending to engine");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Next output line, or `None` once `deadline` has passed.
    fn recv_until(&mut self, deadline: Instant) -> Result<Option<String>, UciError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match self.events.recv_timeout(remaining) {
            Ok(EngineEvent::Line(line)) => {
                debug!(line = %line, "received from engine");
                Ok(Some(line))
            }
            Ok(EngineEvent::OutputClosed) | Err(RecvTimeoutError::Disconnected) => {
                Err(UciError::EngineExited)
            }
            Err(RecvTimeoutError::Timeout) => Ok(None),
        }
    }

    /// Read lines until `wanted` matches one, skipping everything else.
    fn wait_for(
        &mut self,
        waiting_for: &'static str,
        mut wanted: impl FnMut(&EngineLine) -> bool,
    ) -> Result<(), UciError> {
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        while let Some(line) = self.recv_until(deadline)? {
            match parse_engine_line(&line) {
                Ok(parsed) if wanted(&parsed) => return Ok(()),
                Ok(_) => {}
                Err(e) => warn!(error = %e, line = %line, "unparsable engine output"),
            }
        }
        Err(UciError::Timeout { waiting_for })
    }

    fn handshake(&mut self) -> Result<(), UciError> {
        self.send(&EngineCommand::Uci)?;
        let mut name = None;
        self.wait_for("uciok", |line| match line {
            EngineLine::Id { key, value } if key == "name" => {
                name = Some(value.clone());
                false
            }
            EngineLine::UciOk => true,
            _ => false,
        })?;
        info!(name = name.as_deref().unwrap_or("unknown"), "engine identified");
        self.name = name;
        Ok(())
    }

    /// Send `isready` and wait for `readyok`.
    pub fn wait_ready(&mut self) -> Result<(), UciError> {
        self.send(&EngineCommand::IsReady)?;
        self.wait_for("readyok", |line| *line == EngineLine::ReadyOk)
    }

    /// Analyse the position in `fen` under `config`'s limits.
    ///
    /// Collects `info` lines until `bestmove`. If the engine overruns its
    /// time limit, `stop` is sent and whatever was collected is returned.
    pub fn analyse(&mut self, fen: &str, config: &AnalysisConfig) -> Result<Analysis, UciError> {
        let mut analysis = Analysis::new(fen)?;
        self.send(&EngineCommand::position(fen))?;
        self.send(&EngineCommand::Go(config.go_params()))?;

        let mut deadline = Instant::now() + config.movetime + GRACE;
        let mut stopped = false;
        loop {
            let Some(line) = self.recv_until(deadline)? else {
                if stopped {
                    warn!(fen, "no bestmove after stop");
                    return Ok(analysis);
                }
                warn!(fen, "search overran its limit, sending stop");
                self.send(&EngineCommand::Stop)?;
                stopped = true;
                deadline = Instant::now() + GRACE;
                continue;
            };
            match parse_engine_line(&line) {
                Ok(EngineLine::Info(info)) => analysis.update(info),
                Ok(EngineLine::BestMove(best)) => {
                    analysis.finish(best);
                    return Ok(analysis);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, line = %line, "unparsable engine output"),
            }
        }
    }

    fn shutdown(&mut self) {
        let _ = self.send(&EngineCommand::Quit);
        let deadline = Instant::now() + QUIT_TIMEOUT;
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => break,
                Ok(None) if Instant::now() < deadline => thread::sleep(Duration::from_millis(10)),
                _ => {
                    warn!("engine ignored quit, killing");
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    break;
                }
            }
        }
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        info!("engine stopped");
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.shutdown();
    }
}
