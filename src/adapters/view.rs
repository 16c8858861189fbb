use crate::core::render::render_page;
use crate::domain::ports::ResultsView;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Streams each rendered fragment to a writer (stdout in the CLI).
pub struct WriterView<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterView<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultsView for WriterView<W> {
    fn show(&mut self, html: &str) -> Result<()> {
        writeln!(self.writer, "{}", html)?;
        self.writer.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        tracing::debug!("🧹 Results cleared");
        Ok(())
    }

    fn scroll_to_results(&mut self) {
        tracing::debug!("⬇️ Scroll to results");
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            tracing::info!("⏳ Searching...");
        }
    }
}

/// Keeps a standalone HTML page on disk in sync with the latest results.
#[derive(Debug, Clone)]
pub struct HtmlFileView {
    path: PathBuf,
}

impl HtmlFileView {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write_page(&self, fragment: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, render_page(fragment))?;
        Ok(())
    }
}

impl ResultsView for HtmlFileView {
    fn show(&mut self, html: &str) -> Result<()> {
        self.write_page(html)?;
        tracing::debug!("📁 Results written to {}", self.path.display());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.write_page("")
    }
}
