//! Format decoders: uploaded bytes in, plain text out.
//!
//! Decoders only recover text and validate the container. All extraction
//! heuristics live in the engine, so every format goes through the same
//! pipeline.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use resume_parser::RawDocument;
use thiserror::Error;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const PDF_MAGIC: &[u8] = b"%PDF";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// Decompressed size limit for `word/document.xml` (zip-bomb protection).
const MAX_DOCUMENT_XML_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("file is not a Word document (missing ZIP signature)")]
    NotZip,

    #[error("invalid Word document: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Word document has no word/document.xml part")]
    MissingDocumentXml,

    #[error("word/document.xml exceeds {MAX_DOCUMENT_XML_BYTES} bytes")]
    DocumentXmlTooLarge,

    #[error("malformed Word XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("text file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("I/O error while reading document: {0}")]
    Io(#[from] std::io::Error),

    #[error("decoder crashed on malformed input")]
    Crashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Text => "text",
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            MIME_PDF => Some(DocumentFormat::Pdf),
            MIME_DOCX => Some(DocumentFormat::Docx),
            "text/plain" | "text/markdown" => Some(DocumentFormat::Text),
            _ => None,
        }
    }

    fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            "txt" | "text" | "md" => Some(DocumentFormat::Text),
            _ => None,
        }
    }

    fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(PDF_MAGIC) {
            DocumentFormat::Pdf
        } else if bytes.starts_with(ZIP_MAGIC) {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Text
        }
    }

    /// Content type first, then file extension, then magic bytes.
    pub fn detect(
        content_type: Option<&str>,
        file_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self, DecodeError> {
        if let Some(format) = content_type.and_then(Self::from_content_type) {
            return Ok(format);
        }
        if let Some(format) = file_name.and_then(Self::from_file_name) {
            return Ok(format);
        }
        if let Some(ct) = content_type {
            if ct.starts_with("image/") || ct.starts_with("audio/") || ct.starts_with("video/") {
                return Err(DecodeError::Unsupported(ct.to_string()));
            }
        }
        if let Some(ext) = file_name.and_then(|n| n.rsplit_once('.')).map(|(_, e)| e) {
            if matches!(ext.to_ascii_lowercase().as_str(), "doc" | "rtf" | "odt" | "pages") {
                return Err(DecodeError::Unsupported(format!(".{ext}")));
            }
        }
        Ok(Self::sniff(bytes))
    }
}

pub fn decode(bytes: &[u8], format: DocumentFormat) -> Result<RawDocument, DecodeError> {
    let text = match format {
        DocumentFormat::Pdf => decode_pdf(bytes)?,
        DocumentFormat::Docx => decode_docx(bytes)?,
        DocumentFormat::Text => decode_text(bytes)?,
    };
    Ok(RawDocument::from_text(text))
}

fn decode_pdf(bytes: &[u8]) -> Result<String, DecodeError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| DecodeError::Pdf(e.to_string()))
}

fn decode_text(bytes: &[u8]) -> Result<String, DecodeError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    Ok(std::str::from_utf8(bytes)?.to_string())
}

fn decode_docx(bytes: &[u8]) -> Result<String, DecodeError> {
    if !bytes.starts_with(ZIP_MAGIC) {
        return Err(DecodeError::NotZip);
    }
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let entry = match archive.by_name("word/document.xml") {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Err(DecodeError::MissingDocumentXml),
        Err(e) => return Err(e.into()),
    };
    let mut xml = Vec::new();
    entry.take(MAX_DOCUMENT_XML_BYTES).read_to_end(&mut xml)?;
    if xml.len() as u64 >= MAX_DOCUMENT_XML_BYTES {
        return Err(DecodeError::DocumentXmlTooLarge);
    }
    document_text(&xml)
}

/// Collects `w:t` runs, ending a line at each paragraph and break.
fn document_text(xml: &[u8]) -> Result<String, DecodeError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut out = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::Text(t) if in_text => out.push_str(&t.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => out.push('\t'),
                b"br" | b"cr" => out.push('\n'),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}
