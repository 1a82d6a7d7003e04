use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Url;

use super::AzureError;

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

// Azurite's published development account. Not a secret.
const DEVELOPMENT_ACCOUNT: &str = "devstoreaccount1";
const DEVELOPMENT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEVELOPMENT_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

/// How requests are authorized.
#[derive(Clone, PartialEq)]
pub enum AccountCredential {
    /// `AccountName` + base64 `AccountKey`, used for Shared Key signing
    SharedKey { account: String, key: String },
    /// Pre-signed query string, appended verbatim to every request
    SharedAccessSignature(String),
}

impl fmt::Debug for AccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"[REDACTED]")
                .finish(),
            Self::SharedAccessSignature(_) => f
                .debug_tuple("SharedAccessSignature")
                .field(&"[REDACTED]")
                .finish(),
        }
    }
}

/// Parsed Azure Storage connection string.
///
/// Supports the `key=value;key=value` form emitted by the Azure portal,
/// SAS-only strings with an explicit `BlobEndpoint`, and
/// `UseDevelopmentStorage=true` for Azurite.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub blob_endpoint: Url,
    pub credential: AccountCredential,
}

impl ConnectionString {
    fn development() -> Result<Self, AzureError> {
        Ok(Self {
            account_name: Some(DEVELOPMENT_ACCOUNT.to_string()),
            blob_endpoint: parse_endpoint(DEVELOPMENT_BLOB_ENDPOINT)?,
            credential: AccountCredential::SharedKey {
                account: DEVELOPMENT_ACCOUNT.to_string(),
                key: DEVELOPMENT_KEY.to_string(),
            },
        })
    }
}

impl FromStr for ConnectionString {
    type Err = AzureError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut settings: HashMap<String, String> = HashMap::new();

        for pair in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            // Account keys end in '=' padding, so only split on the first one.
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid("expected key=value segments".to_string()))?;
            settings.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        if settings.is_empty() {
            return Err(invalid("connection string is empty".to_string()));
        }

        if settings
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
        {
            return Self::development();
        }

        let account_name = settings.get("accountname").cloned();

        let blob_endpoint = match settings.get("blobendpoint") {
            Some(endpoint) => parse_endpoint(endpoint)?,
            None => {
                let account = account_name.as_deref().ok_or_else(|| {
                    invalid("either AccountName or BlobEndpoint is required".to_string())
                })?;
                let protocol = settings
                    .get("defaultendpointsprotocol")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PROTOCOL);
                let suffix = settings
                    .get("endpointsuffix")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENDPOINT_SUFFIX);
                parse_endpoint(&format!("{}://{}.blob.{}", protocol, account, suffix))?
            }
        };

        let credential = if let Some(key) = settings.get("accountkey") {
            let account = account_name.clone().ok_or_else(|| {
                invalid("AccountKey requires AccountName".to_string())
            })?;
            AccountCredential::SharedKey {
                account,
                key: key.clone(),
            }
        } else if let Some(sas) = settings.get("sharedaccesssignature") {
            AccountCredential::SharedAccessSignature(sas.trim_start_matches('?').to_string())
        } else {
            return Err(invalid(
                "no AccountKey or SharedAccessSignature present".to_string(),
            ));
        };

        Ok(Self {
            account_name,
            blob_endpoint,
            credential,
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, AzureError> {
    let url = Url::parse(raw).map_err(|e| invalid(format!("invalid blob endpoint: {}", e)))?;
    if url.cannot_be_a_base() {
        return Err(invalid("blob endpoint must be an absolute URL".to_string()));
    }
    Ok(url)
}

fn invalid(message: String) -> AzureError {
    AzureError::InvalidConnectionString { message }
}
