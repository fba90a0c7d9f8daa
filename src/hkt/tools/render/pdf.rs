use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::hkt::tools::error::{Result, ToolError};
use crate::hkt::tools::render::HtmlToPdf;

/// Converts HTML to PDF by running the `wkhtmltopdf` command line tool.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    binary: PathBuf,
}

impl WkhtmltopdfConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Arguments passed to the converter; the PDF is written to stdout.
    pub fn arguments(&self, html: &Path, stylesheet: Option<&Path>) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--encoding".to_string(),
            "UTF-8".to_string(),
        ];
        if let Some(stylesheet) = stylesheet {
            args.push("--user-style-sheet".to_string());
            args.push(stylesheet.display().to_string());
        }
        args.push(html.display().to_string());
        args.push("-".to_string());
        args
    }
}

impl Default for WkhtmltopdfConverter {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl HtmlToPdf for WkhtmltopdfConverter {
    fn html_to_pdf(&self, html: &Path, stylesheet: Option<&Path>) -> Result<Vec<u8>> {
        let args = self.arguments(html, stylesheet);
        debug!(binary = %self.binary.display(), ?args, "running PDF converter");
        let output = Command::new(&self.binary).args(&args).output().map_err(|err| {
            ToolError::Render(format!(
                "failed to run {}: {err}",
                self.binary.display()
            ))
        })?;

        if !output.status.success() {
            return Err(ToolError::Render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if output.stdout.is_empty() {
            return Err(ToolError::Render(format!(
                "{} produced no output for {}",
                self.binary.display(),
                html.display()
            )));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_is_optional() {
        let converter = WkhtmltopdfConverter::default();

        let plain = converter.arguments(Path::new("in.html"), None);
        let styled = converter.arguments(Path::new("in.html"), Some(Path::new("style.css")));

        assert_eq!(plain, vec!["--quiet", "--encoding", "UTF-8", "in.html", "-"]);
        assert_eq!(
            styled,
            vec!["--quiet", "--encoding", "UTF-8", "--user-style-sheet", "style.css", "in.html", "-"]
        );
    }

    #[test]
    fn missing_binary_is_a_render_error() {
        let converter = WkhtmltopdfConverter::new("/nonexistent/wkhtmltopdf-binary");

        let error = converter
            .html_to_pdf(Path::new("in.html"), None)
            .expect_err("spawn fails");

        assert!(matches!(error, ToolError::Render(_)));
    }
}
