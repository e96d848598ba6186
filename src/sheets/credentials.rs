//! Service account credentials for the Sheets API

use crate::error::{Result, SheetError};
use base64::prelude::{BASE64_STANDARD, BASE64_URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Read/write scope for spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Path to a service account key file
pub const CREDENTIALS_FILE_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Base64-encoded service account key JSON, used when no key file is configured
pub const CREDENTIALS_BASE64_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS_BASE64_JSON";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Google service account key, as downloaded from the cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccount {
    pub client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
}

impl fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct JwtHeader<'a> {
    alg: &'static str,
    typ: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kid: Option<&'a str>,
}

#[derive(Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    exp: i64,
    iat: i64,
}

impl ServiceAccount {
    /// Parse a service account key from its JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| {
            SheetError::Credentials(format!("failed to parse service account key: {}", e))
        })
    }

    /// Load a service account key file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| {
            SheetError::Credentials(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&input)
    }

    /// Decode a base64 (standard alphabet) service account key
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = BASE64_STANDARD
            .decode(encoded.trim())
            .map_err(|e| SheetError::Credentials(format!("failed to decode base64 key: {}", e)))?;
        let input = String::from_utf8(decoded)
            .map_err(|e| SheetError::Credentials(format!("key is not UTF-8: {}", e)))?;
        Self::from_json(&input)
    }

    /// Build the signed JWT bearer assertion exchanged for an access token
    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
            kid: self.private_key_id.as_deref(),
        };
        let claims = JwtClaims {
            iss: &self.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let key_pair = self.key_pair()?;
        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| SheetError::Credentials("failed to sign assertion".to_string()))?;

        Ok(format!(
            "{}.{}",
            signing_input,
            BASE64_URL_SAFE_NO_PAD.encode(&signature)
        ))
    }

    fn key_pair(&self) -> Result<RsaKeyPair> {
        let mut reader = std::io::Cursor::new(self.private_key.as_bytes());
        let item = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| SheetError::Credentials(format!("invalid PEM private key: {}", e)))?;
        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => RsaKeyPair::from_pkcs8(der.secret_pkcs8_der())
                .map_err(|e| SheetError::Credentials(format!("rejected pkcs8 key: {}", e))),
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => RsaKeyPair::from_der(der.secret_pkcs1_der())
                .map_err(|e| SheetError::Credentials(format!("rejected pkcs1 key: {}", e))),
            _ => Err(SheetError::Credentials(
                "no RSA private key in service account".to_string(),
            )),
        }
    }
}

/// How requests to the Sheets API are authorized
#[derive(Clone, Debug)]
pub enum Credentials {
    /// Service account key; access tokens are minted and refreshed on demand
    ServiceAccount(ServiceAccount),
    /// A pre-issued OAuth access token used as-is
    AccessToken(String),
}

impl Credentials {
    /// Resolve credentials from the process environment
    ///
    /// `GOOGLE_APPLICATION_CREDENTIALS` (a key file path) is tried first, then
    /// `GOOGLE_APPLICATION_CREDENTIALS_BASE64_JSON`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through a variable lookup function
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match var(CREDENTIALS_FILE_ENV).filter(|path| !path.is_empty()) {
            Some(path) => match ServiceAccount::from_file(&path) {
                Ok(account) => {
                    info!(path = %path, "credentials from {}", CREDENTIALS_FILE_ENV);
                    return Ok(Credentials::ServiceAccount(account));
                }
                Err(e) => warn!(error = %e, "falling back to {}", CREDENTIALS_BASE64_ENV),
            },
            None => warn!("{} is not set", CREDENTIALS_FILE_ENV),
        }

        let encoded = var(CREDENTIALS_BASE64_ENV)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                SheetError::Credentials(format!("env {} is empty", CREDENTIALS_BASE64_ENV))
            })?;
        let account = ServiceAccount::from_base64(&encoded)?;
        info!("credentials from {}", CREDENTIALS_BASE64_ENV);
        Ok(Credentials::ServiceAccount(account))
    }
}

impl From<ServiceAccount> for Credentials {
    fn from(account: ServiceAccount) -> Self {
        Credentials::ServiceAccount(account)
    }
}
