//! Durable record of an in-progress email verification.
//!
//! The session lives under three fixed keys so a restarted flow can pick up
//! where the seller left off. Every operation here is best-effort: failures are
//! logged and never reach the caller.

use veloo_core::{Email, FormData, KeyValueStore, KeyValueStoreError};

pub const SESSION_FLAG_KEY: &str = "veloo_show_otp_verification";
pub const VERIFIED_EMAIL_KEY: &str = "veloo_verified_email";
pub const FORM_DATA_KEY: &str = "veloo_form_data";

const SESSION_ACTIVE: &str = "true";

// Write order: the flag goes last so an interrupted save never marks a
// session active over missing data.
const KEYS: [&str; 3] = [FORM_DATA_KEY, VERIFIED_EMAIL_KEY, SESSION_FLAG_KEY];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub email: Email,
    pub form: FormData,
}

type StoredValues = [Option<String>; 3];

#[derive(Debug, Clone)]
pub struct VerificationStore<S> {
    store: S,
}

impl<S> VerificationStore<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Overwrites the stored session. On a failed write the previous values
    /// are put back.
    #[tracing::instrument(name = "VerificationStore::save", skip(self, form))]
    pub async fn save(&self, email: &Email, form: &FormData) {
        let form_json = match serde_json::to_string(form) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize form data");
                return;
            }
        };

        let previous = match self.read_all().await {
            Ok(values) => Some(values),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read previous verification state");
                None
            }
        };

        let values = [form_json.as_str(), email.as_str(), SESSION_ACTIVE];
        for (key, value) in KEYS.into_iter().zip(values) {
            if let Err(e) = self.store.set(key, value).await {
                tracing::error!(key, error = %e, "Failed to save verification state");
                if let Some(previous) = previous {
                    self.restore(previous).await;
                }
                return;
            }
        }
    }

    /// Reads the stored session.
    ///
    /// Partial or malformed state is discarded entirely and reported as no
    /// session.
    #[tracing::instrument(name = "VerificationStore::load", skip(self))]
    pub async fn load(&self) -> Option<StoredSession> {
        let values = match self.read_all().await {
            Ok(values) => values,
            Err(KeyValueStoreError::UnexpectedError(reason)) => {
                tracing::warn!(%reason, "Discarding unreadable verification state");
                self.clear().await;
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not read verification state");
                return None;
            }
        };

        if values.iter().all(Option::is_none) {
            return None;
        }

        match parse_session(values) {
            Ok(session) => {
                tracing::info!(email = %session.email, "Restored verification session");
                Some(session)
            }
            Err(reason) => {
                tracing::warn!(reason, "Discarding corrupted verification state");
                self.clear().await;
                None
            }
        }
    }

    #[tracing::instrument(name = "VerificationStore::clear", skip(self))]
    pub async fn clear(&self) {
        for key in KEYS {
            if let Err(e) = self.store.remove(key).await {
                tracing::error!(key, error = %e, "Failed to clear verification state");
            }
        }
    }

    async fn read_all(&self) -> Result<StoredValues, KeyValueStoreError> {
        let mut values: StoredValues = Default::default();
        for (slot, key) in values.iter_mut().zip(KEYS) {
            *slot = self.store.get(key).await?;
        }
        Ok(values)
    }

    async fn restore(&self, previous: StoredValues) {
        for (key, value) in KEYS.into_iter().zip(previous) {
            let result = match value {
                Some(value) => self.store.set(key, &value).await,
                None => self.store.remove(key).await,
            };
            if let Err(e) = result {
                tracing::error!(key, error = %e, "Failed to restore verification state");
            }
        }
    }
}

fn parse_session([form, email, flag]: StoredValues) -> Result<StoredSession, &'static str> {
    if flag.as_deref() != Some(SESSION_ACTIVE) {
        return Err("session flag is not set");
    }
    let email = email
        .and_then(|email| Email::parse(email).ok())
        .ok_or("stored email is missing or invalid")?;
    let form = form.ok_or("stored form data is missing")?;
    let form: FormData =
        serde_json::from_str(&form).map_err(|_| "stored form data is not valid JSON")?;

    Ok(StoredSession {
        email,
        form: form.normalized(),
    })
}
