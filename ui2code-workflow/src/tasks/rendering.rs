use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use ui2code_core::{ComponentRenderer, RenderError, RendererSettings};

/// Runs an external renderer as
/// `<program> <args...> <output_png> <base64 jsx> [<base64 scss>]`.
///
/// Exit status zero means the screenshot was written.
#[derive(Debug, Clone)]
pub struct ProcessRenderer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessRenderer {
    pub fn new(command: Vec<String>, timeout: Option<Duration>) -> Result<Self, RenderError> {
        let mut parts = command.into_iter();
        let program = parts.next().ok_or(RenderError::NotConfigured)?;
        Ok(Self {
            program,
            args: parts.collect(),
            timeout,
        })
    }

    pub fn from_settings(settings: &RendererSettings) -> Result<Self, RenderError> {
        Self::new(settings.command.clone(), settings.timeout())
    }

    /// Arguments appended after the configured command.
    pub fn render_arguments(jsx: &str, scss: Option<&str>, output: &Path) -> Vec<String> {
        let mut args = vec![output.to_string_lossy().into_owned(), STANDARD.encode(jsx)];
        if let Some(scss) = scss.filter(|s| !s.is_empty()) {
            args.push(STANDARD.encode(scss));
        }
        args
    }
}

#[async_trait]
impl ComponentRenderer for ProcessRenderer {
    async fn render(&self, jsx: &str, scss: Option<&str>, output: &Path) -> Result<(), RenderError> {
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RenderError::OutputDir {
                    path: parent.to_path_buf(),
                    message: e.to_string(),
                })?;
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .args(Self::render_arguments(jsx, scss, output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            program = %self.program,
            output = %output.display(),
            with_scss = scss.is_some_and(|s| !s.is_empty()),
            "Rendering component"
        );

        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RenderError::ExecutableNotFound(self.program.clone()),
            _ => RenderError::Io(e),
        })?;

        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| RenderError::Timeout(limit))??,
            None => child.wait_with_output().await?,
        };

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        if !stdout.trim().is_empty() {
            debug!(stdout = %stdout.trim(), "Renderer stdout");
        }

        if !result.status.success() {
            warn!(code = ?result.status.code(), stderr = %stderr.trim(), "Renderer failed");
            return Err(RenderError::NonZeroExit {
                code: result.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Renderer stderr");
        }
        Ok(())
    }
}
