use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use crate::config::{GitConfig, DEFAULT_OUTPUT_LIMIT};

#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to run git {args}: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {args} failed ({code}): {stderr}")]
    Failed {
        args: String,
        code: String,
        stderr: String,
    },

    #[error("git {args} produced more than {limit} bytes of output")]
    OutputLimit { args: String, limit: usize },
}

/// Captured result of a successful git invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the lifecycle pipelines and the git executable.
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Run git with `args` in `cwd`. Nonzero exit is an error carrying stderr.
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError>;
}

/// Runs the real git executable with bounded output capture.
#[derive(Debug, Clone)]
pub struct ProcessGit {
    binary: PathBuf,
    output_limit: usize,
}

impl Default for ProcessGit {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("git"),
            output_limit: DEFAULT_OUTPUT_LIMIT,
        }
    }
}

impl ProcessGit {
    pub fn new(binary: impl Into<PathBuf>, output_limit: usize) -> Self {
        Self {
            binary: binary.into(),
            output_limit,
        }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(&config.binary, config.output_limit_bytes)
    }
}

struct Captured {
    bytes: Vec<u8>,
    overflowed: bool,
}

/// Reads at most `limit` bytes, then drains the rest so the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> std::io::Result<Captured> {
    let mut bytes = Vec::new();
    (&mut reader)
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut bytes)
        .await?;

    let overflowed = bytes.len() > limit;
    if overflowed {
        bytes.truncate(limit);
        tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    }

    Ok(Captured { bytes, overflowed })
}

#[async_trait]
impl GitRunner for ProcessGit {
    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
        let joined = args.join(" ");
        debug!("git {} (in {})", joined, cwd.display());

        let spawn_err = |source| GitError::Spawn {
            args: joined.clone(),
            source,
        };

        let mut child = Command::new(&self.binary)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_err(std::io::Error::other("stdout not captured")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| spawn_err(std::io::Error::other("stderr not captured")))?;

        let (out, err) = tokio::try_join!(
            read_capped(stdout, self.output_limit),
            read_capped(stderr, self.output_limit)
        )
        .map_err(spawn_err)?;

        let status = child.wait().await.map_err(spawn_err)?;

        if out.overflowed || err.overflowed {
            return Err(GitError::OutputLimit {
                args: joined,
                limit: self.output_limit,
            });
        }

        let stdout = String::from_utf8_lossy(&out.bytes).into_owned();
        let stderr = String::from_utf8_lossy(&err.bytes).into_owned();

        if !status.success() {
            let code = status
                .code()
                .map(|c| format!("exit code {c}"))
                .unwrap_or_else(|| "terminated by signal".to_string());
            return Err(GitError::Failed {
                args: joined,
                code,
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(GitOutput { stdout, stderr })
    }
}

#[cfg(test)]
pub mod mock_git {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// One recorded invocation: working directory plus arguments.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Call {
        pub cwd: PathBuf,
        pub args: Vec<String>,
    }

    impl Call {
        pub fn line(&self) -> String {
            self.args.join(" ")
        }
    }

    /// Records every call and answers from a script; unscripted calls succeed with empty output.
    #[derive(Default)]
    pub struct MockGit {
        calls: Mutex<Vec<Call>>,
        responses: Mutex<VecDeque<(String, Result<GitOutput, String>)>>,
    }

    impl MockGit {
        pub fn new() -> Self {
            Self::default()
        }

        /// Next call whose argument line starts with `prefix` returns `stdout`.
        pub fn respond(self, prefix: &str, stdout: &str) -> Self {
            self.responses.lock().unwrap().push_back((
                prefix.to_string(),
                Ok(GitOutput {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                }),
            ));
            self
        }

        /// Next call whose argument line starts with `prefix` fails with `stderr`.
        pub fn fail(self, prefix: &str, stderr: &str) -> Self {
            self.responses
                .lock()
                .unwrap()
                .push_back((prefix.to_string(), Err(stderr.to_string())));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn lines(&self) -> Vec<String> {
            self.calls().iter().map(Call::line).collect()
        }
    }

    #[async_trait]
    impl GitRunner for MockGit {
        async fn run(&self, cwd: &Path, args: &[&str]) -> Result<GitOutput, GitError> {
            let line = args.join(" ");
            self.calls.lock().unwrap().push(Call {
                cwd: cwd.to_path_buf(),
                args: args.iter().map(|a| a.to_string()).collect(),
            });

            let mut responses = self.responses.lock().unwrap();
            let found = responses
                .iter()
                .position(|(prefix, _)| line.starts_with(prefix.as_str()));
            match found.and_then(|i| responses.remove(i)) {
                Some((_, Ok(output))) => Ok(output),
                Some((_, Err(stderr))) => Err(GitError::Failed {
                    args: line,
                    code: "exit code 1".to_string(),
                    stderr,
                }),
                None => Ok(GitOutput::default()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn run_captures_stdout_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ProcessGit::default();

        let output = git.run(tmp.path(), &["--version"]).await.unwrap();
        assert!(
            output.stdout.starts_with("git version"),
            "run: should capture git's stdout, got {:?}",
            output.stdout
        );
    }

    #[tokio::test]
    async fn run_fails_with_stderr_on_nonzero_exit() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ProcessGit::default();

        let err = git.run(tmp.path(), &["status"]).await.unwrap_err();
        match err {
            GitError::Failed { stderr, .. } => assert!(
                stderr.to_lowercase().contains("not a git repository"),
                "run: stderr should be carried in the error, got {stderr:?}"
            ),
            other => panic!("run: expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_rejects_output_over_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ProcessGit::new("git", 8);

        let err = git.run(tmp.path(), &["--version"]).await.unwrap_err();
        assert!(
            matches!(err, GitError::OutputLimit { limit: 8, .. }),
            "run: output beyond the ceiling should fail, got {err:?}"
        );
    }

    #[tokio::test]
    async fn run_reports_missing_binary_as_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let git = ProcessGit::new("/nonexistent/git-binary-xyz", 1024);

        let err = git.run(tmp.path(), &["status"]).await.unwrap_err();
        assert!(matches!(err, GitError::Spawn { .. }));
    }

    #[tokio::test]
    async fn read_capped_keeps_short_input_intact() {
        let captured = read_capped(&b"hello"[..], 16).await.unwrap();
        assert_eq!(captured.bytes, b"hello");
        assert!(!captured.overflowed);
    }

    #[tokio::test]
    async fn read_capped_flags_input_one_past_limit() {
        let captured = read_capped(&b"hello"[..], 4).await.unwrap();
        assert_eq!(captured.bytes, b"hell");
        assert!(captured.overflowed);
    }

    #[tokio::test]
    async fn read_capped_accepts_maximum_limit() {
        let captured = read_capped(&b"hello"[..], usize::MAX).await.unwrap();
        assert_eq!(captured.bytes, b"hello");
        assert!(!captured.overflowed);
    }
}
