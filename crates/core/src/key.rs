use chrono::{NaiveDate, Utc};
use rand::Rng;

/// Number of characters in the random token of a generated key.
pub const TOKEN_LEN: usize = 13;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Destination name of an uploaded object inside the bucket.
///
/// Format: `<directory><YYYY-MM-DD>-<token><extension>`, e.g.
/// `notes/2026-10-19-k3v9x0m2p7q1z.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Generate a key for `original_filename` under `directory_prefix`, using
    /// today's UTC date and the thread-local random generator.
    pub fn generate(original_filename: &str, directory_prefix: &str) -> Self {
        Self::generate_with(
            original_filename,
            directory_prefix,
            Utc::now().date_naive(),
            &mut rand::thread_rng(),
        )
    }

    /// Generate a key with an explicit date and random source.
    pub fn generate_with<R: Rng + ?Sized>(
        original_filename: &str,
        directory_prefix: &str,
        date: NaiveDate,
        rng: &mut R,
    ) -> Self {
        let token = random_token(rng);
        let ext = extension(original_filename);
        Self(format!(
            "{directory_prefix}{}-{token}{ext}",
            date.format("%Y-%m-%d")
        ))
    }

    /// Borrow the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ObjectKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

/// Generate an object key as a plain string.
///
/// Shorthand for [`ObjectKey::generate`].
pub fn generate_key(original_filename: &str, directory_prefix: &str) -> String {
    ObjectKey::generate(original_filename, directory_prefix).into_string()
}

/// Extension of `filename` including the leading dot, or `""` if it has none.
///
/// Only the last path component is considered. A name whose only dots are
/// leading ones (`.gitignore`, `..`) has no extension.
pub fn extension(filename: &str) -> &str {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    match base.rfind('.') {
        Some(idx) if !base[..idx].bytes().all(|b| b == b'.') => &base[idx..],
        _ => "",
    }
}

/// Draw a [`TOKEN_LEN`]-character lowercase base-36 token.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| char::from(BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())]))
        .collect()
}
