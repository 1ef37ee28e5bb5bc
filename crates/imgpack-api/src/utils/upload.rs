//! Multipart parsing for the conversion form

use axum::extract::Multipart;
use imgpack_core::UploadedFile;
use std::collections::HashMap;

use crate::constants::FILES_FIELD;
use crate::error::HttpAppError;

/// Text fields and file parts of one conversion request.
#[derive(Debug, Default)]
pub struct ConversionForm {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Read the whole form. File parts under `files` are collected in submission order;
/// file parts under any other name are ignored. For repeated text fields the first value wins.
pub async fn read_conversion_form(mut multipart: Multipart) -> Result<ConversionForm, HttpAppError> {
    let mut form = ConversionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field.file_name().is_some() {
            if field_name != FILES_FIELD {
                tracing::debug!(field = %field_name, "Ignoring file part outside the files field");
                continue;
            }

            let original_filename = field.file_name().map(|s| s.to_string());
            let mime_type = field.content_type().map(|s| s.to_string());
            let data = field.bytes().await?;

            form.files
                .push(UploadedFile::new(data, original_filename, mime_type));
        } else {
            let value = field.text().await?;
            form.fields.entry(field_name).or_insert(value);
        }
    }

    Ok(form)
}
