use crate::error::CheckError;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Install locations of the two perccli generations, probed in this order.
pub const DEFAULT_PATHS: [&str; 2] = [
    "/opt/MegaRAID/perccli/perccli64",
    "/opt/MegaRAID/perccli2/perccli2",
];

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDERR_TAIL: usize = 400;

/// The three fixed capability queries issued on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Controllers,
    VirtualDrives,
    PhysicalDrives,
}

impl Query {
    pub fn args(&self) -> [&'static str; 4] {
        match self {
            Query::Controllers    => ["/call", "show", "all", "j"],
            Query::VirtualDrives  => ["/call/vall", "show", "all", "j"],
            Query::PhysicalDrives => ["/call/eall/sall", "show", "all", "j"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Query::Controllers    => "controllers",
            Query::VirtualDrives  => "virtual drives",
            Query::PhysicalDrives => "physical drives",
        }
    }
}

/// Source of parsed perccli documents. The real implementation shells out;
/// tests substitute canned output.
pub trait Runner {
    fn query(&self, query: Query) -> Result<Value, CheckError>;
}

/// Runs the perccli executable synchronously with a hard timeout.
#[derive(Debug, Clone)]
pub struct PercCli {
    path:    PathBuf,
    timeout: Duration,
}

impl PercCli {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { path: path.into(), timeout }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run perccli with `args` and return its stdout.
    fn run(&self, args: &[&str]) -> Result<String, CheckError> {
        debug!("running {} {}", self.path.display(), args.join(" "));

        let mut child = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Drain both pipes concurrently. A descendant may keep a pipe open after
        // the child exits, so the readers are bounded by the same deadline.
        let (tx, rx) = mpsc::channel();
        spawn_reader(child.stdout.take(), Pipe::Stdout, tx.clone());
        spawn_reader(child.stderr.take(), Pipe::Stderr, tx);

        let deadline = Instant::now() + self.timeout;
        let timed_out = || CheckError::Timeout { seconds: self.timeout.as_secs() };
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        let (mut stdout, mut stderr) = (None, None);
        while stdout.is_none() || stderr.is_none() {
            match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                Ok((Pipe::Stdout, text)) => stdout = Some(text),
                Ok((Pipe::Stderr, text)) => stderr = Some(text),
                Err(RecvTimeoutError::Timeout) => return Err(timed_out()),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        let stdout = stdout.unwrap_or_default();
        let stderr = stderr.unwrap_or_default();

        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(CheckError::ExitStatus { code, stderr: tail(stderr.trim(), STDERR_TAIL) });
        }

        debug!("perccli returned {} bytes", stdout.len());
        Ok(stdout)
    }
}

impl Runner for PercCli {
    fn query(&self, query: Query) -> Result<Value, CheckError> {
        let stdout = self.run(&query.args())?;
        decode(&stdout)
    }
}

/// Parse perccli stdout as a JSON document.
pub fn decode(text: &str) -> Result<Value, CheckError> {
    Ok(serde_json::from_str(text)?)
}

/// First installed perccli generation, falling back to the classic path.
pub fn default_path() -> PathBuf {
    DEFAULT_PATHS
        .iter()
        .map(Path::new)
        .find(|p| p.is_file())
        .unwrap_or_else(|| Path::new(DEFAULT_PATHS[0]))
        .to_path_buf()
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
    Stdout,
    Stderr,
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>, which: Pipe, tx: Sender<(Pipe, String)>) {
    thread::spawn(move || {
        let _ = tx.send((which, read_all(pipe)));
    });
}

fn read_all<R: Read>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut p) = pipe {
        let _ = p.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Last `max` characters of `s`.
fn tail(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        return s.to_string();
    }
    s.chars().skip(count - max).collect()
}
