//! Filesystem report sink.

use std::fs;
use std::path::PathBuf;

use mandato_core::ReportSink;
use tracing::info;

/// Writes exported reports into a fixed download directory.
#[derive(Debug, Clone)]
pub struct FsReportSink {
    dir: PathBuf,
}

impl FsReportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl ReportSink for FsReportSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_creates_directory_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("descargas");
        let sink = FsReportSink::new(target.clone());

        sink.save("ventas_2026-03-14_42.pdf", b"%PDF")
            .expect("save report");

        let written = fs::read(target.join("ventas_2026-03-14_42.pdf")).expect("read back");
        assert_eq!(written, b"%PDF");
    }
}
