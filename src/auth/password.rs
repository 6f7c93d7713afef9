use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use tracing::error;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    // Checked against when the account is unknown so every failed login costs
    // one argon2 run.
    static ref DUMMY_HASH: String = hash_password("placeholder-credential").unwrap_or_default();
}

/// Registration policy: at least `MIN_PASSWORD_LEN` characters.
pub fn check_policy(plain: &str) -> Result<(), &'static str> {
    if plain.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password too short");
    }
    Ok(())
}

/// Argon2id digest in PHC form; the salt travels inside the string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            anyhow::anyhow!("hash password: {e}")
        })
}

/// `Ok(false)` on mismatch; `Err` only when the stored digest is unreadable.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password digest unreadable");
        anyhow::anyhow!("parse password digest: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies against the account's digest, or burns an equivalent check when
/// there is no account, so both outcomes take about as long.
pub fn verify_account(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(digest) => verify_password(plain, digest),
        None => {
            let _ = verify_password(plain, &DUMMY_HASH);
            Ok(false)
        }
    }
}
