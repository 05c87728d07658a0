//! Text extraction for uploaded files

use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};
use crate::types::FileType;

/// Multi-format text extractor
pub struct FileParser;

impl FileParser {
    /// Detect the type of `filename`, rejecting unsupported extensions
    pub fn detect(filename: &str) -> Result<FileType> {
        FileType::from_filename(filename).ok_or_else(|| {
            let extension = filename
                .rsplit_once('.')
                .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default();
            Error::UnsupportedFileType(format!(
                "'{}'. Supported: {}",
                extension,
                FileType::SUPPORTED_EXTENSIONS.join(", ")
            ))
        })
    }

    /// Extract plain text from a file's bytes based on its extension.
    ///
    /// CPU-bound for PDF and DOCX; call from a blocking task.
    pub fn extract(filename: &str, data: &[u8]) -> Result<String> {
        match Self::detect(filename)? {
            FileType::Pdf => Self::extract_pdf(filename, data),
            FileType::Docx => Self::extract_docx(filename, data),
            FileType::Txt | FileType::Markdown | FileType::Csv => Self::decode_utf8(filename, data),
        }
    }

    fn extract_pdf(filename: &str, data: &[u8]) -> Result<String> {
        // pdf-extract panics on some malformed font tables
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(data)
        }))
        .map_err(|_| Error::file_parse(filename, "PDF extractor crashed"))?
        .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        Ok(extracted
            .replace('\0', "")
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn extract_docx(filename: &str, data: &[u8]) -> Result<String> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in doc.document.children {
            if let docx_rs::DocumentChild::Paragraph(p) = child {
                let mut text = String::new();
                for child in p.children {
                    if let docx_rs::ParagraphChild::Run(run) = child {
                        for child in run.children {
                            if let docx_rs::RunChild::Text(t) = child {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                paragraphs.push(text);
            }
        }

        Ok(paragraphs.join("\n"))
    }

    fn decode_utf8(filename: &str, data: &[u8]) -> Result<String> {
        String::from_utf8(data.to_vec())
            .map_err(|e| Error::file_parse(filename, format!("File is not valid UTF-8: {}", e)))
    }
}
