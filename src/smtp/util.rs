use rand::{Rng, distributions::Alphanumeric};

/// Lower-case alphanumeric token of exactly `len` characters.
pub(crate) fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}
