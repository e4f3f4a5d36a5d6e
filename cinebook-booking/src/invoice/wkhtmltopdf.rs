use async_trait::async_trait;
use cinebook_core::invoice::{DocumentEngine, InvoiceLayout, RenderError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Converts the invoice as HTML through an external `wkhtmltopdf` binary,
/// piping the page in on stdin and reading the PDF from stdout.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfEngine {
    binary: PathBuf,
}

impl WkhtmltopdfEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl DocumentEngine for WkhtmltopdfEngine {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    async fn convert(&self, layout: &InvoiceLayout) -> Result<Vec<u8>, RenderError> {
        let html = render_html(layout);

        let mut child = Command::new(&self.binary)
            .args(["--quiet", "--encoding", "utf-8", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    RenderError::EngineUnavailable(format!("{}: {}", self.binary.display(), e))
                }
                _ => RenderError::EngineFailed(e.to_string()),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| RenderError::EngineFailed(format!("writing page: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| RenderError::EngineFailed(e.to_string()))?;

        if !output.status.success() || output.stdout.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::EngineFailed(format!(
                "{} exited with {}: {}",
                self.name(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

pub(crate) fn render_html(layout: &InvoiceLayout) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape(&layout.title)));
    for (label, value) in &layout.lines {
        html.push_str(&format!(
            "<p><strong>{}:</strong> {}</p>\n",
            escape(label),
            escape(value)
        ));
    }
    html.push_str("</body></html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
