//! Multipart upload extraction and validation.

use axum::extract::Multipart;

use sortbin::codec;
use sortbin::config::UploadConfig;

use crate::error::UploadError;

/// One file part of a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Declared content type, falling back to the file extension and then to
    /// the leading bytes when the client sent none or a generic one.
    pub fn mime_type(&self) -> Option<String> {
        let declared = self
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream");
        if let Some(declared) = declared {
            return Some(declared.to_ascii_lowercase());
        }

        mime_guess::from_path(&self.filename)
            .first()
            .map(|m| m.essence_str().to_string())
            .or_else(|| codec::sniff_mime_type(&self.bytes).map(str::to_string))
    }

    pub fn validate(&self, config: &UploadConfig) -> Result<(), UploadError> {
        let allowed = self
            .mime_type()
            .is_some_and(|mime_type| config.is_allowed(&mime_type));
        if !allowed {
            return Err(UploadError::UnsupportedMediaType {
                allowed: config.allowed_mime_types.join(", "),
            });
        }

        if self.bytes.len() > config.max_bytes {
            return Err(UploadError::PayloadTooLarge {
                max_mb: config.max_bytes / (1024 * 1024),
            });
        }

        Ok(())
    }
}

/// Collects every file sent under `field_name`, in request order.
pub async fn read_files(
    multipart: &mut Multipart,
    field_name: &'static str,
) -> Result<Vec<Upload>, UploadError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        uploads.push(Upload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(uploads)
}

pub async fn read_single_file(
    multipart: &mut Multipart,
    field_name: &'static str,
) -> Result<Upload, UploadError> {
    read_files(multipart, field_name)
        .await?
        .into_iter()
        .next()
        .ok_or(UploadError::MissingFile { field: field_name })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(filename: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Upload {
        Upload {
            filename: filename.to_string(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    #[test]
    fn test_mime_type_resolution() {
        struct Case {
            name: &'static str,
            upload: Upload,
            expected: Option<&'static str>,
        }

        let png_header = b"\x89PNG\r\n\x1a\n".to_vec();
        let cases = vec![
            Case {
                name: "declared",
                upload: upload("a.bin", Some("image/PNG"), Vec::new()),
                expected: Some("image/png"),
            },
            Case {
                name: "extension",
                upload: upload("a.jpg", Some("application/octet-stream"), Vec::new()),
                expected: Some("image/jpeg"),
            },
            Case {
                name: "sniffed",
                upload: upload("upload", None, png_header),
                expected: Some("image/png"),
            },
            Case {
                name: "unknown",
                upload: upload("upload", None, b"hello".to_vec()),
                expected: None,
            },
        ];

        for case in cases {
            assert_eq!(
                case.upload.mime_type().as_deref(),
                case.expected,
                "case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_validate_rejects_unsupported_type() {
        let config = UploadConfig::default();
        let result = upload("doc.pdf", Some("application/pdf"), vec![1, 2, 3]).validate(&config);
        assert!(matches!(
            result,
            Err(UploadError::UnsupportedMediaType { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_file() {
        let config = UploadConfig {
            max_bytes: 4,
            ..UploadConfig::default()
        };
        let result = upload("a.png", Some("image/png"), vec![0; 5]).validate(&config);
        assert!(matches!(result, Err(UploadError::PayloadTooLarge { .. })));

        assert!(upload("a.png", Some("image/png"), vec![0; 4])
            .validate(&config)
            .is_ok());
    }
}
