use std::path::Path;

/// A single entry in the enrichment run log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    Enriched {
        game: String,
        assets_downloaded: Vec<String>,
        metadata: bool,
    },
    Skipped {
        game: String,
        reason: String,
    },
    NoMatch {
        game: String,
    },
    Error {
        game: String,
        message: String,
    },
}

/// Collects per-game enrichment results and writes a log file.
#[derive(Debug, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for entry in &self.entries {
            match entry {
                LogEntry::Enriched {
                    assets_downloaded, ..
                } => {
                    summary.enriched += 1;
                    summary.assets_downloaded += assets_downloaded.len();
                }
                LogEntry::Skipped { .. } => summary.skipped += 1,
                LogEntry::NoMatch { .. } => summary.no_match += 1,
                LogEntry::Error { .. } => summary.errors += 1,
            }
        }
        summary
    }

    /// Write the log to a file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Enrichment Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Enriched: {}", summary.enriched)?;
        writeln!(file, "Skipped: {}", summary.skipped)?;
        writeln!(file, "No match: {}", summary.no_match)?;
        writeln!(file, "Errors: {}", summary.errors)?;
        writeln!(file, "Assets downloaded: {}", summary.assets_downloaded)?;
        writeln!(file)?;
        writeln!(file, "--- Details ---")?;
        writeln!(file)?;

        for entry in &self.entries {
            match entry {
                LogEntry::Enriched {
                    game,
                    assets_downloaded,
                    metadata,
                } => {
                    writeln!(file, "[OK] {}", game)?;
                    if !assets_downloaded.is_empty() {
                        writeln!(file, "     Assets: {}", assets_downloaded.join(", "))?;
                    }
                    if *metadata {
                        writeln!(file, "     Metadata: yes")?;
                    }
                }
                LogEntry::Skipped { game, reason } => {
                    writeln!(file, "[SKIPPED] {}: {}", game, reason)?;
                }
                LogEntry::NoMatch { game } => {
                    writeln!(file, "[NO MATCH] {}", game)?;
                }
                LogEntry::Error { game, message } => {
                    writeln!(file, "[ERROR] {}: {}", game, message)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub enriched: usize,
    pub skipped: usize,
    pub no_match: usize,
    pub errors: usize,
    pub assets_downloaded: usize,
}
