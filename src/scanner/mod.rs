// Scanner Module - Camera Seam
//
// The camera is an external collaborator: anything that can hand the
// workflow decoded barcodes and accept a torch flag satisfies `ScanSource`.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use tracing::debug;

/// Barcode symbologies a source may decode. The workflow consumes QR only;
/// everything else is dropped at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Qr,
    Code128,
    Ean13,
}

/// One decoded barcode from a scan source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedCode {
    pub symbology: Symbology,
    pub text: String,
}

impl ScannedCode {
    pub fn qr(text: impl Into<String>) -> Self {
        Self {
            symbology: Symbology::Qr,
            text: text.into(),
        }
    }
}

/// Source of scan events for the workflow
#[async_trait]
pub trait ScanSource {
    /// Next decoded code, or `None` when the source is exhausted
    async fn next_code(&mut self) -> Option<ScannedCode>;

    /// Torch control; sources without a lamp may ignore it
    fn set_torch(&mut self, on: bool);
}

/// Scan source backed by a file of blank-line-delimited payloads.
///
/// Stands in for the camera in batch mode: each payload block is yielded as
/// one decoded QR code.
#[derive(Debug)]
pub struct FileScanSource {
    payloads: VecDeque<String>,
    torch_on: bool,
}

impl FileScanSource {
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_content(&content))
    }

    pub fn from_content(content: &str) -> Self {
        let mut payloads = VecDeque::new();
        let mut current: Vec<&str> = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    payloads.push_back(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            payloads.push_back(current.join("\n"));
        }
        Self {
            payloads,
            torch_on: false,
        }
    }

    pub fn remaining(&self) -> usize {
        self.payloads.len()
    }
}

#[async_trait]
impl ScanSource for FileScanSource {
    async fn next_code(&mut self) -> Option<ScannedCode> {
        self.payloads.pop_front().map(ScannedCode::qr)
    }

    fn set_torch(&mut self, on: bool) {
        self.torch_on = on;
        debug!(torch_on = on, "Torch flag set on file source");
    }
}
