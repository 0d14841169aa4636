//! Text extraction keyed by file extension

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use crate::error::{Error, Result};

/// Supported source formats, detected from the normalized file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.txt`, `.md`, `.csv`, `.json`: stored and indexed as raw text
    PlainText,
    /// `.pdf`: text layers extracted from the binary
    Pdf,
    /// `.docx`: prose text stripped out of the OOXML container
    Docx,
}

impl SourceFormat {
    /// Extensions accepted for upload
    pub const ALLOWED_EXTENSIONS: &'static [&'static str] =
        &[".txt", ".md", ".csv", ".json", ".pdf", ".docx"];

    /// Detect the format from a filename, e.g. "Report.PDF" -> `Pdf`.
    /// Returns a validation error for unsupported or missing extensions.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let ext = filename
            .rfind('.')
            .map(|idx| filename[idx..].to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            ".txt" | ".md" | ".csv" | ".json" => Ok(Self::PlainText),
            ".pdf" => Ok(Self::Pdf),
            ".docx" => Ok(Self::Docx),
            _ => Err(Error::Validation(format!(
                "Unsupported file type \"{}\". Allowed: {}",
                ext,
                Self::ALLOWED_EXTENSIONS.join(", ")
            ))),
        }
    }

    /// Extract plain text from the raw file bytes.
    pub fn extract(&self, data: &[u8]) -> Result<String> {
        match self {
            Self::PlainText => Ok(String::from_utf8_lossy(data).into_owned()),
            Self::Pdf => extract_pdf(data),
            Self::Docx => extract_docx(data),
        }
    }
}

fn extract_pdf(data: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::Validation(format!("Could not parse the PDF: {}", e)))?;
    if text.trim().is_empty() {
        return Err(Error::Validation(
            "Could not extract text from the PDF. The file may be scanned/image-only.".to_string(),
        ));
    }
    Ok(text)
}

fn extract_docx(data: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(data)
        .map_err(|e| Error::Validation(format!("Could not parse the DOCX file: {}", e)))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            let mut line = String::new();
            for pc in &paragraph.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in &run.children {
                        if let RunChild::Text(text) = rc {
                            line.push_str(&text.text);
                        }
                    }
                }
            }
            if !line.trim().is_empty() {
                paragraphs.push(line);
            }
        }
    }

    let text = paragraphs.join("\n\n");
    if text.trim().is_empty() {
        return Err(Error::Validation(
            "Could not extract text from the DOCX file.".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_detection_is_case_insensitive() {
        assert_eq!(
            SourceFormat::from_filename("Report.PDF").unwrap(),
            SourceFormat::Pdf
        );
        assert_eq!(
            SourceFormat::from_filename("notes.TXT").unwrap(),
            SourceFormat::PlainText
        );
        assert_eq!(
            SourceFormat::from_filename("a.docx").unwrap(),
            SourceFormat::Docx
        );
    }

    #[test]
    fn text_like_formats_all_map_to_plain_text() {
        for name in ["a.txt", "a.md", "a.csv", "a.json"] {
            assert_eq!(
                SourceFormat::from_filename(name).unwrap(),
                SourceFormat::PlainText
            );
        }
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        for name in ["archive.zip", "image.png", "noext", "weird.exe"] {
            assert!(SourceFormat::from_filename(name).is_err());
        }
    }

    #[test]
    fn plain_text_extraction_passes_bytes_through() {
        let text = SourceFormat::PlainText.extract("hello world".as_bytes()).unwrap();
        assert_eq!(text, "hello world");
    }
}
