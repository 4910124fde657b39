//! Collision-resistant storage name generation for staged uploads.
//!
//! The asset store is a shared filesystem namespace with no locking, so
//! name uniqueness is the only collision defense. Names combine a
//! millisecond timestamp with a random component, which keeps concurrent
//! requests uploading identically-named files from colliding.

use rand::Rng;

/// Maximum extension length carried over from the declared filename.
const MAX_EXT_LEN: usize = 10;

/// Generate a unique storage name for an uploaded file.
///
/// The declared (client-supplied) filename contributes only its
/// extension, sanitized to lowercase ASCII alphanumerics; everything else
/// about the name is server-generated. Example output:
/// `1724830000123-2890154771.jpg`.
pub fn generate_storage_name(declared_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce: u32 = rand::rng().random();

    match sanitized_extension(declared_name) {
        Some(ext) => format!("{millis}-{nonce}.{ext}"),
        None => format!("{millis}-{nonce}"),
    }
}

/// Extract a safe file extension from a client-supplied filename.
///
/// Returns `None` when the name has no extension or the extension
/// contains nothing usable (path tricks, control characters, etc.).
fn sanitized_extension(declared_name: &str) -> Option<String> {
    let raw = declared_name.rsplit_once('.').map(|(_, ext)| ext)?;
    let ext: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXT_LEN)
        .collect::<String>()
        .to_lowercase();

    if ext.is_empty() { None } else { Some(ext) }
}
