//! HTML form decoding and field validation.
//!
//! Post forms arrive either URL-encoded or as `multipart/form-data` when an
//! image is attached; both are decoded into the same [`FormData`]. Validation
//! mirrors the rendered forms: each failing input collects its messages in
//! [`FieldErrors`] so the page can be re-rendered with them inline.

use std::collections::HashMap;

use actix_multipart::Multipart;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, web};
use futures_util::StreamExt;
use tracing::debug;

use crate::domain::ports::Validated;
use crate::domain::validation::{INVALID_CHOICE_MESSAGE, INVALID_IMAGE_MESSAGE, REQUIRED_MESSAGE};
use crate::domain::{BodyText, Error, FieldErrors, GroupId, ImageUpload, PostDraft};
use crate::inbound::http::pages::PostFormValues;

/// Upper bound for URL-encoded bodies and for the text parts of multipart
/// bodies.
pub const MAX_FORM_BYTES: usize = 64 * 1024;
/// Upper bound for a single uploaded file.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// A file part of a multipart submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Browsers send an empty, unnamed part when no file was chosen.
    fn is_blank(&self) -> bool {
        self.filename.is_empty() && self.bytes.is_empty()
    }
}

/// Decoded form fields and file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Value of a text field, or `""` when absent. Repeated fields keep the
    /// last value.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    /// A file part, if one was sent under `name`.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.insert(name.to_owned(), value.into());
        self
    }

    pub fn with_file(mut self, name: &str, filename: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(
            name.to_owned(),
            UploadedFile {
                filename: filename.to_owned(),
                bytes: bytes.into(),
            },
        );
        self
    }

    fn from_urlencoded(body: &[u8]) -> Self {
        let fields = url::form_urlencoded::parse(body).into_owned().collect();
        Self {
            fields,
            files: HashMap::new(),
        }
    }
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("multipart/form-data"))
}

fn too_large(what: &str) -> Error {
    Error::invalid_request(format!("{what} exceeds the allowed size"))
}

/// Read a form body of either encoding.
///
/// Oversized bodies and malformed multipart streams are `InvalidRequest`.
pub async fn read_form(req: &HttpRequest, payload: web::Payload) -> Result<FormData, Error> {
    if is_multipart(req) {
        read_multipart(Multipart::new(req.headers(), payload)).await
    } else {
        read_urlencoded(payload).await
    }
}

async fn read_urlencoded(mut payload: web::Payload) -> Result<FormData, Error> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk =
            chunk.map_err(|err| Error::invalid_request(format!("failed to read form: {err}")))?;
        if body.len() + chunk.len() > MAX_FORM_BYTES {
            return Err(too_large("form body"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(FormData::from_urlencoded(&body))
}

async fn read_multipart(mut multipart: Multipart) -> Result<FormData, Error> {
    let mut form = FormData::default();
    while let Some(field) = multipart.next().await {
        let mut field = field
            .map_err(|err| Error::invalid_request(format!("malformed multipart body: {err}")))?;
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let filename = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let limit = if filename.is_some() {
            MAX_UPLOAD_BYTES
        } else {
            MAX_FORM_BYTES
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk
                .map_err(|err| Error::invalid_request(format!("malformed multipart body: {err}")))?;
            if bytes.len() + chunk.len() > limit {
                return Err(too_large(&name));
            }
            bytes.extend_from_slice(&chunk);
        }

        match filename {
            Some(filename) => {
                debug!(field = %name, size = bytes.len(), "received file part");
                form.files.insert(name, UploadedFile { filename, bytes });
            }
            None => {
                let value = String::from_utf8(bytes)
                    .map_err(|_| Error::invalid_request(format!("field {name} is not UTF-8")))?;
                form.fields.insert(name, value);
            }
        }
    }
    Ok(form)
}

fn required_text(form: &FormData, errors: &mut FieldErrors) -> Option<BodyText> {
    let text = BodyText::new(form.field("text"));
    if text.is_none() {
        errors.add("text", REQUIRED_MESSAGE);
    }
    text
}

/// Validate the post form, returning the values to echo back alongside the
/// outcome.
pub fn validate_post(form: &FormData) -> (PostFormValues, Validated<PostDraft>) {
    let values = PostFormValues {
        text: form.field("text").to_owned(),
        group: form.field("group").trim().to_owned(),
    };
    let mut errors = FieldErrors::new();
    let text = required_text(form, &mut errors);

    let group = match values.group.as_str() {
        "" => None,
        raw => match raw.parse::<i64>() {
            Ok(id) => Some(GroupId::new(id)),
            Err(_) => {
                errors.add("group", INVALID_CHOICE_MESSAGE);
                None
            }
        },
    };

    let image = match form.file("image").filter(|file| !file.is_blank()) {
        None => None,
        Some(file) => match ImageUpload::from_upload(&file.filename, file.bytes.clone()) {
            Ok(upload) => Some(upload),
            Err(err) => {
                debug!(error = %err, filename = %file.filename, "rejected image upload");
                errors.add("image", INVALID_IMAGE_MESSAGE);
                None
            }
        },
    };

    let outcome = match text {
        Some(text) if errors.is_empty() => Ok(PostDraft { text, group, image }),
        _ => Err(errors),
    };
    (values, outcome)
}

/// Validate the comment form, returning the submitted text alongside the
/// outcome.
pub fn validate_comment(form: &FormData) -> (String, Validated<BodyText>) {
    let mut errors = FieldErrors::new();
    let text = required_text(form, &mut errors);
    let outcome = text.ok_or(errors);
    (form.field("text").to_owned(), outcome)
}
