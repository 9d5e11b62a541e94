//! Renderer that runs an external headless browser

use crate::config::RendererConfig;
use crate::render::{RenderError, RenderedPage, Renderer};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs `program args... <url>` and takes stdout as the rendered DOM
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    name: String,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandRenderer {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            timeout,
        }
    }

    pub fn from_config(config: &RendererConfig) -> Self {
        Self::new(
            config.name.clone(),
            config.program.clone(),
            config.args.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn render(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RenderError::Spawn {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| RenderError::Timeout {
                provider: self.name.clone(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| RenderError::Spawn {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(RenderError::Failed {
                provider: self.name.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(RenderError::Empty {
                provider: self.name.clone(),
            });
        }

        Ok(RenderedPage {
            provider: self.name.clone(),
            html,
        })
    }
}
