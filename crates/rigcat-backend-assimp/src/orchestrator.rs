//! Assimp subprocess orchestrator.
//!
//! This module spawns the `assimp` command-line tool for conversion (`export`),
//! scene statistics (`info`) and scene-graph dumps (`dump`), with a timeout on
//! every invocation.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::{AssimpError, AssimpResult};

/// Default timeout for a single assimp invocation.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// File name of the XML scene dump inside its temp directory.
const DUMP_FILE_NAME: &str = "scene.assxml";

/// The operations the catalog needs from an external scene tool.
///
/// Implemented by [`Assimp`]; tests substitute scripted implementations.
pub trait SceneTool {
    /// Converts `input` into a binary glTF at `output`.
    ///
    /// The parent directory of `output` must already exist.
    fn convert(&self, input: &Path, output: &Path) -> AssimpResult<()>;

    /// Returns the tool's free-form statistics report for `input`.
    fn describe_scene(&self, input: &Path) -> AssimpResult<String>;

    /// Returns an XML dump of the scene graph of `input`.
    fn dump_scene_graph(&self, input: &Path) -> AssimpResult<String>;
}

impl<T: SceneTool + ?Sized> SceneTool for &T {
    fn convert(&self, input: &Path, output: &Path) -> AssimpResult<()> {
        (**self).convert(input, output)
    }

    fn describe_scene(&self, input: &Path) -> AssimpResult<String> {
        (**self).describe_scene(input)
    }

    fn dump_scene_graph(&self, input: &Path) -> AssimpResult<String> {
        (**self).dump_scene_graph(input)
    }
}

/// Configuration for the assimp orchestrator.
#[derive(Debug, Clone)]
pub struct AssimpConfig {
    /// Path to the assimp executable.
    pub assimp_path: Option<PathBuf>,
    /// Timeout for each assimp invocation.
    pub timeout: Duration,
}

impl Default for AssimpConfig {
    fn default() -> Self {
        Self {
            assimp_path: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AssimpConfig {
    /// Sets the assimp executable path.
    pub fn assimp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.assimp_path = Some(path.into());
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Captured result of a finished assimp process.
#[derive(Debug)]
struct ProcessOutput {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// The assimp command-line tool.
#[derive(Debug, Clone)]
pub struct Assimp {
    executable: PathBuf,
    timeout: Duration,
}

impl Assimp {
    /// Locates the assimp executable and creates an orchestrator for it.
    pub fn with_config(config: AssimpConfig) -> AssimpResult<Self> {
        let executable = find_assimp(config.assimp_path.as_deref())?;
        Ok(Self {
            executable,
            timeout: config.timeout,
        })
    }

    /// Creates an orchestrator for a known executable without searching.
    pub fn from_executable(executable: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            timeout,
        }
    }

    /// Returns the resolved executable path.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Runs `assimp <command> <args...>` and fails on timeout or non-zero exit.
    fn run(&self, command: &'static str, args: &[&Path]) -> AssimpResult<ProcessOutput> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(command);
        for arg in args {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(AssimpError::SpawnFailed)?;
        let output = wait_with_timeout(child, self.timeout, command)?;

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(AssimpError::process_failed(
                command,
                exit_code,
                output.stderr.trim(),
            ));
        }

        Ok(output)
    }
}

impl SceneTool for Assimp {
    fn convert(&self, input: &Path, output: &Path) -> AssimpResult<()> {
        // assimp export <input> <output>; the format follows the .glb extension
        self.run("export", &[input, output])?;
        if !output.exists() {
            return Err(AssimpError::OutputNotFound {
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }

    fn describe_scene(&self, input: &Path) -> AssimpResult<String> {
        Ok(self.run("info", &[input])?.stdout)
    }

    fn dump_scene_graph(&self, input: &Path) -> AssimpResult<String> {
        // assimp dump <input> <out.assxml> -s (shortened XML)
        let temp_dir = tempfile::tempdir()?;
        let dump_path = temp_dir.path().join(DUMP_FILE_NAME);
        self.run("dump", &[input, dump_path.as_path(), Path::new("-s")])?;

        std::fs::read_to_string(&dump_path).map_err(|source| AssimpError::ReadDumpFailed {
            path: dump_path.clone(),
            source,
        })
    }
}

/// Finds the assimp executable path.
///
/// Search order: explicit override, `ASSIMP_PATH`, `PATH`, common install locations.
pub fn find_assimp(override_path: Option<&Path>) -> AssimpResult<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
    }

    if let Ok(path) = std::env::var("ASSIMP_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Ok(path);
        }
    }

    let names = if cfg!(windows) {
        vec!["assimp.exe", "assimp"]
    } else {
        vec!["assimp"]
    };
    for name in names {
        if let Ok(path) = which::which(name) {
            return Ok(path);
        }
    }

    let common_paths = if cfg!(windows) {
        vec!["C:\\Program Files\\Assimp\\bin\\x64\\assimp.exe"]
    } else if cfg!(target_os = "macos") {
        vec!["/opt/homebrew/bin/assimp", "/usr/local/bin/assimp"]
    } else {
        vec!["/usr/bin/assimp", "/usr/local/bin/assimp"]
    };
    for path_str in common_paths {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(AssimpError::AssimpNotFound)
}

/// Reads a pipe to the end on a background thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            buf = String::from_utf8_lossy(&bytes).into_owned();
        }
        buf
    })
}

/// Kills the child if it is still running and waits for it to exit.
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    command: &'static str,
) -> AssimpResult<ProcessOutput> {
    let start = Instant::now();
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    kill_and_reap(&mut child);
                    return Err(AssimpError::Timeout {
                        command,
                        timeout_secs: timeout.as_secs(),
                    });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => {
                kill_and_reap(&mut child);
                return Err(AssimpError::SpawnFailed(e));
            }
        }
    };

    Ok(ProcessOutput {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}
