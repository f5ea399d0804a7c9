//! Session context: who is signed in on this device.
//!
//! The app keeps its login state in a flat key-value store. Rather than
//! reading that store from wherever it is needed, the state is loaded once
//! into a [`SessionContext`] and passed explicitly to the payment flow.

mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;
use tracing::info;

use crate::error::ValidationError;
use crate::request::normalize_contact;

pub const PHONE_NUMBER_KEY: &str = "userPhoneNumber";
pub const USER_NAME_KEY: &str = "userName";
pub const MPIN_KEY: &str = "mpin";
pub const MPIN_CREATED_KEY: &str = "isMpinCreated";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session store: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse session store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid session value: {0}")]
    Validation(#[from] ValidationError),

    #[error("MPIN must be 4 to 6 digits")]
    InvalidMpin,

    #[error("MPIN hashing error: {0}")]
    Hash(String),
}

/// Name and contact of the signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer<'a> {
    pub name: &'a str,
    pub contact: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    phone_number: Option<String>,
    user_name: Option<String>,
    mpin_hash: Option<String>,
    mpin_created: bool,
}

impl SessionContext {
    /// Load the session from `store`.
    ///
    /// An MPIN stored in plain text is hashed and written back.
    pub fn load<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<Self, SessionError> {
        let mpin_hash = match store.get(MPIN_KEY) {
            Some(stored) if !is_hashed(&stored) => {
                let hashed = hash_mpin(&stored)?;
                store.set(MPIN_KEY, &hashed)?;
                info!("Stored MPIN hashed and session store updated");
                Some(hashed)
            }
            other => other,
        };

        Ok(Self {
            phone_number: store.get(PHONE_NUMBER_KEY),
            user_name: store.get(USER_NAME_KEY),
            mpin_hash,
            mpin_created: store.get(MPIN_CREATED_KEY).as_deref() == Some("true"),
        })
    }

    /// Record a signed-in user (after OTP verification).
    pub fn sign_in<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        phone_number: &str,
        user_name: &str,
    ) -> Result<(), SessionError> {
        let phone_number = normalize_contact(phone_number)?;
        let user_name = user_name.trim();
        if user_name.is_empty() {
            return Err(ValidationError::MissingField("user name").into());
        }
        store.set(PHONE_NUMBER_KEY, &phone_number)?;
        store.set(USER_NAME_KEY, user_name)?;
        self.phone_number = Some(phone_number);
        self.user_name = Some(user_name.to_string());
        Ok(())
    }

    /// Create or replace the MPIN.
    pub fn set_mpin<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        mpin: &str,
    ) -> Result<(), SessionError> {
        if !(4..=6).contains(&mpin.len()) || !mpin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SessionError::InvalidMpin);
        }
        let hashed = hash_mpin(mpin)?;
        store.set(MPIN_KEY, &hashed)?;
        store.set(MPIN_CREATED_KEY, "true")?;
        self.mpin_hash = Some(hashed);
        self.mpin_created = true;
        Ok(())
    }

    /// Check an entered MPIN against the stored hash.
    pub fn verify_mpin(&self, mpin: &str) -> bool {
        let Some(hash) = self.mpin_hash.as_deref() else {
            return false;
        };
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(mpin.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Forget the signed-in user and MPIN.
    pub fn sign_out<S: KeyValueStore + ?Sized>(&mut self, store: &mut S) -> Result<(), SessionError> {
        for key in [PHONE_NUMBER_KEY, USER_NAME_KEY, MPIN_KEY, MPIN_CREATED_KEY] {
            store.remove(key)?;
        }
        *self = Self::default();
        Ok(())
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn is_mpin_created(&self) -> bool {
        self.mpin_created && self.mpin_hash.is_some()
    }

    /// The signed-in customer, if both name and phone are known.
    pub fn customer(&self) -> Option<Customer<'_>> {
        Some(Customer {
            name: self.user_name.as_deref()?,
            contact: self.phone_number.as_deref()?,
        })
    }
}

fn is_hashed(value: &str) -> bool {
    value.starts_with("$argon2")
}

fn hash_mpin(mpin: &str) -> Result<String, SessionError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(mpin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SessionError::Hash(e.to_string()))
}
