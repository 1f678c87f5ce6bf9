use serde::{Deserialize, Serialize};
use std::fmt;

/// Document and spreadsheet formats the analysis service ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Xlsx,
    Csv,
}

impl DocumentKind {
    pub fn all() -> &'static [DocumentKind] {
        &[
            DocumentKind::Pdf,
            DocumentKind::Docx,
            DocumentKind::Xlsx,
            DocumentKind::Csv,
        ]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Xlsx => "xlsx",
            DocumentKind::Csv => "csv",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentKind::Csv => "text/csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "Word",
            DocumentKind::Xlsx => "Excel",
            DocumentKind::Csv => "CSV",
        }
    }

    /// Case-insensitive match on the final extension of `file_name`.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        Self::all().iter().copied().find(|k| k.extension() == ext)
    }

    /// Matches the media type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        Self::all().iter().copied().find(|k| k.media_type() == essence)
    }
}

/// A file the user picked or dropped, ready to be sent as multipart.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    /// Media type as declared by the browser, if any
    pub media_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.filter(|m| !m.trim().is_empty()),
            bytes,
        }
    }

    /// The declared kind: extension first, then declared media type.
    pub fn declared_kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_file_name(&self.file_name).or_else(|| {
            self.media_type
                .as_deref()
                .and_then(DocumentKind::from_media_type)
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What the service reports after ingesting a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub session_id: String,
    pub title: String,
    pub attached_document: Option<String>,
    pub chunks: Option<u32>,
}
