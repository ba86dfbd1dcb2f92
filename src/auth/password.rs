//! Password hashing.
//!
//! bcrypt with a per-hash random salt. The cost is fixed per process by
//! configuration.
//!
//! bcrypt only reads the first [`MAX_PASSWORD_BYTES`] bytes of its input, so
//! longer passwords are refused instead of silently truncated.

/// Longest password, in bytes, that bcrypt hashes without truncation.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Credential hashing failures.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    // ---
    #[error("password hashing failed: {0}")]
    Hashing(#[source] bcrypt::BcryptError),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(#[source] bcrypt::BcryptError),

    #[error("password exceeds {MAX_PASSWORD_BYTES} bytes")]
    TooLong,
}

/// Hashes and verifies user passwords at a fixed bcrypt cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    // ---
    pub fn new(cost: u32) -> Self {
        // ---
        Self { cost }
    }

    /// Produces a salted one-way hash of `plaintext`.
    ///
    /// Equal inputs yield different hashes; each still verifies. Input longer
    /// than [`MAX_PASSWORD_BYTES`] is [`PasswordError::TooLong`].
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        // ---
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(PasswordError::TooLong);
        }
        bcrypt::hash(plaintext, self.cost).map_err(PasswordError::Hashing)
    }

    /// Checks `plaintext` against a stored hash.
    ///
    /// A wrong password is `Ok(false)`, not an error. Input longer than
    /// [`MAX_PASSWORD_BYTES`] never matches: no stored hash was made from it.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        // ---
        if plaintext.len() > MAX_PASSWORD_BYTES {
            // Still parse the hash so a corrupt row surfaces the same way.
            bcrypt::verify("", hash).map_err(PasswordError::MalformedHash)?;
            return Ok(false);
        }
        bcrypt::verify(plaintext, hash).map_err(PasswordError::MalformedHash)
    }
}
