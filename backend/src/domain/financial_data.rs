//! External financial data generator.
//!
//! The generator is an opaque program invoked as
//! `<program> [extra args] <user_id> <output_path>`. On a zero exit status it
//! must have written a JSON document to `output_path`; the file is read once
//! and removed. Anything else is reported as an error carrying stderr.

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

#[async_trait]
pub trait FinancialDataGenerator: Send + Sync {
    /// Produce a fresh financial data document for `user_id`
    async fn generate(&self, user_id: &str) -> Result<Value>;
}

/// Runs the configured program as a child process
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    program: PathBuf,
    args: Vec<String>,
    output_dir: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessGenerator {
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        output_dir: impl Into<PathBuf>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            output_dir: output_dir.into(),
            timeout,
        }
    }

    /// `user_<id>_<millis>_financial_data.json`, with the id reduced to filename-safe characters
    fn output_path(&self, user_id: &str) -> PathBuf {
        let safe_id: String = user_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        let millis = chrono::Utc::now().timestamp_millis();
        self.output_dir
            .join(format!("user_{}_{}_financial_data.json", safe_id, millis))
    }

    async fn remove_output(path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove generator output {}: {}", path.display(), e);
            }
        }
    }
}

#[async_trait]
impl FinancialDataGenerator for ProcessGenerator {
    async fn generate(&self, user_id: &str) -> Result<Value> {
        let output_path = self.output_path(user_id);
        info!(
            "Running financial data generator {} for user {}",
            self.program.display(),
            user_id
        );

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(user_id)
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = command.output();
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| anyhow!("generator timed out after {}s", limit.as_secs()))?,
            None => run.await,
        }
        .with_context(|| format!("failed to start {}", self.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("Generator output: {}", stdout.trim());
        }

        if !output.status.success() {
            Self::remove_output(&output_path).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("generator exited with {}: {}", output.status, stderr.trim());
        }

        let contents = tokio::fs::read_to_string(&output_path).await;
        Self::remove_output(&output_path).await;
        let contents = contents.with_context(|| {
            format!("failed to read generated file {}", output_path.display())
        })?;

        let data: Value =
            serde_json::from_str(&contents).context("generated file is not valid JSON")?;
        info!("Financial data generated for user {}", user_id);
        Ok(data)
    }
}

/// Used when no generator program is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl FinancialDataGenerator for DisabledGenerator {
    async fn generate(&self, _user_id: &str) -> Result<Value> {
        bail!("financial data generator not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn shell_generator(script: &str, dir: &TempDir, timeout: Option<Duration>) -> ProcessGenerator {
        ProcessGenerator::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "sh".to_string()],
            dir.path(),
            timeout,
        )
    }

    fn dir_is_empty(dir: &TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_successful_generation_reads_and_removes_file() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator(
            r#"printf '{"current_balance": 120.5, "user": "%s"}' "$1" > "$2""#,
            &dir,
            None,
        );

        let data = generator.generate("user_1_abc").await.expect("generation failed");
        assert_eq!(data["current_balance"], 120.5);
        assert_eq!(data["user"], "user_1_abc");
        assert!(dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator("echo 'plaid unavailable' >&2; exit 3", &dir, None);

        let err = generator.generate("user_1_abc").await.unwrap_err();
        assert!(err.to_string().contains("plaid unavailable"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_missing_output_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator("exit 0", &dir, None);

        assert!(generator.generate("user_1_abc").await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error_and_file_removed() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator(r#"echo 'not json' > "$2""#, &dir, None);

        assert!(generator.generate("user_1_abc").await.is_err());
        assert!(dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator("sleep 5", &dir, Some(Duration::from_millis(200)));

        let err = generator.generate("user_1_abc").await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "got: {}", err);
    }

    #[test]
    fn test_output_path_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let generator = shell_generator("true", &dir, None);

        let path = generator.output_path("../evil/user");
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("user____evil_user_"));
        assert!(name.ends_with("_financial_data.json"));
    }

    #[tokio::test]
    async fn test_disabled_generator_fails() {
        let err = DisabledGenerator.generate("user_1_abc").await.unwrap_err();
        assert_eq!(err.to_string(), "financial data generator not configured");
    }
}
