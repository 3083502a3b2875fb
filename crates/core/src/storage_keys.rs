//! Object-storage key naming, upload checks and gallery diffs.

use std::collections::HashSet;

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Largest accepted upload (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Accepted image MIME types and their canonical extensions.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
    ("image/gif", "gif"),
];

/// Key for a file that belongs to an organization's gallery.
pub fn organization_key(organization_id: DbId, extension: &str) -> String {
    format!("organizations/{organization_id}/{}.{extension}", Uuid::new_v4())
}

/// Key for a file uploaded into a named folder.
pub fn folder_key(folder: &str, extension: &str) -> String {
    format!("{folder}/{}.{extension}", Uuid::new_v4())
}

/// Folder names are lowercase ASCII letters, digits, `-` and `_`.
pub fn validate_folder(folder: &str) -> Result<(), CoreError> {
    let valid = !folder.is_empty()
        && folder.len() <= 64
        && folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid folder '{folder}'. Use lowercase letters, digits, '-' or '_'"
        )))
    }
}

/// Resolve the extension for an uploaded image.
///
/// The MIME type must be one of the accepted image types. The filename's
/// extension wins when it agrees with the MIME type family, otherwise the
/// canonical extension for the MIME type is used.
pub fn image_extension(filename: &str, mimetype: &str) -> Result<String, CoreError> {
    let canonical = IMAGE_TYPES
        .iter()
        .find(|(mime, _)| *mime == mimetype)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            CoreError::Validation(format!("Unsupported file type '{mimetype}'"))
        })?;

    let from_name = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ext == canonical || (canonical == "jpg" && ext == "jpeg"));

    Ok(from_name.unwrap_or_else(|| canonical.to_string()))
}

/// Keys present in `old` but not in `new`, in their original order.
pub fn removed_keys(old: &[String], new: &[String]) -> Vec<String> {
    let keep: HashSet<&str> = new.iter().map(String::as_str).collect();
    old.iter()
        .filter(|k| !keep.contains(k.as_str()))
        .cloned()
        .collect()
}

/// Expand a public URL template such as `https://{bucket}.cdn.example/{key}`.
pub fn public_url(template: &str, bucket: &str, key: &str) -> String {
    template.replace("{bucket}", bucket).replace("{key}", key)
}
