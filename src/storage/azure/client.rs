use chrono::Utc;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, StatusCode, Url};

use super::AzureError;
use super::connection_string::{AccountCredential, ConnectionString};
use super::signing::SharedKeySigner;
use super::types::{
    API_VERSION, BlobEnumeration, ContainerEnumeration, ErrorBody, continuation, parse_xml,
};
use crate::remote::RemoteBlob;

const MS_DATE: HeaderName = HeaderName::from_static("x-ms-date");
const MS_VERSION: HeaderName = HeaderName::from_static("x-ms-version");
const MS_BLOB_TYPE: HeaderName = HeaderName::from_static("x-ms-blob-type");
const MS_ERROR_CODE: &str = "x-ms-error-code";

const AUTH_ERROR_CODES: &[&str] = &[
    "AuthenticationFailed",
    "InvalidAuthenticationInfo",
    "NoAuthenticationInformation",
];

#[derive(Clone)]
enum Authorizer {
    SharedKey(SharedKeySigner),
    Sas(String),
}

/// Minimal Blob service client: just the calls the migration needs.
#[derive(Clone)]
pub struct AzureBlobClient {
    client: reqwest::Client,
    endpoint: Url,
    auth: Authorizer,
}

impl AzureBlobClient {
    pub fn from_connection_string(raw: &str) -> Result<Self, AzureError> {
        let connection_string: ConnectionString = raw.parse()?;
        Self::new(connection_string)
    }

    pub fn new(connection_string: ConnectionString) -> Result<Self, AzureError> {
        let auth = match &connection_string.credential {
            AccountCredential::SharedKey { account, key } => {
                Authorizer::SharedKey(SharedKeySigner::new(account, key)?)
            }
            AccountCredential::SharedAccessSignature(sas) => Authorizer::Sas(sas.clone()),
        };

        let client = reqwest::Client::builder()
            .user_agent(concat!("tfstate-migrate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AzureError::Network)?;

        Ok(Self {
            client,
            endpoint: connection_string.blob_endpoint,
            auth,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn list_containers(&self) -> Result<Vec<String>, AzureError> {
        let mut names = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut query = vec![("comp", "list")];
            if let Some(m) = &marker {
                query.push(("marker", m.as_str()));
            }
            let url = self.url(&[], &query)?;

            let body = self
                .send(Method::GET, url, HeaderMap::new(), None)
                .await?
                .text()
                .await?;
            let page: ContainerEnumeration = parse_xml(&body)?;
            names.extend(page.containers.items.into_iter().map(|c| c.name));

            match continuation(page.next_marker) {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(names)
    }

    /// Succeeds iff the container exists and the credential can read it.
    pub async fn get_container_properties(&self, container: &str) -> Result<(), AzureError> {
        let url = self.url(&[container], &[("restype", "container")])?;

        match self.send(Method::GET, url, HeaderMap::new(), None).await {
            Ok(_) => Ok(()),
            Err(AzureError::Api { status: 404, .. }) => Err(AzureError::ContainerNotFound {
                container: container.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    /// Put Blob replaces any existing block blob with the same name.
    pub async fn put_blob(
        &self,
        container: &str,
        blob_name: &str,
        data: Vec<u8>,
    ) -> Result<(), AzureError> {
        let mut segments = vec![container];
        segments.extend(blob_name.split('/').filter(|s| !s.is_empty()));
        let url = self.url(&segments, &[])?;

        let mut headers = HeaderMap::new();
        headers.insert(MS_BLOB_TYPE, HeaderValue::from_static("BlockBlob"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

        match self.send(Method::PUT, url, headers, Some(data)).await {
            Ok(_) => Ok(()),
            Err(AzureError::Api { status: 404, code, .. }) if code == "ContainerNotFound" => {
                Err(AzureError::ContainerNotFound {
                    container: container.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn list_blobs(&self, container: &str) -> Result<Vec<RemoteBlob>, AzureError> {
        let mut blobs = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut query = vec![("restype", "container"), ("comp", "list")];
            if let Some(m) = &marker {
                query.push(("marker", m.as_str()));
            }
            let url = self.url(&[container], &query)?;

            let response = match self.send(Method::GET, url, HeaderMap::new(), None).await {
                Err(AzureError::Api { status: 404, .. }) => {
                    return Err(AzureError::ContainerNotFound {
                        container: container.to_string(),
                    });
                }
                other => other?,
            };
            let body = response.text().await?;
            let page: BlobEnumeration = parse_xml(&body)?;
            blobs.extend(page.blobs.items.into_iter().map(|b| b.into_remote_blob()));

            match continuation(page.next_marker) {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(blobs)
    }

    fn url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, AzureError> {
        let mut url = self.endpoint.clone();

        if segments.is_empty() {
            // Service-level calls address the account root, which must end in '/'.
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
        } else {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AzureError::InvalidConnectionString {
                    message: "blob endpoint must be an absolute URL".to_string(),
                })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        mut url: Url,
        mut headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<Response, AzureError> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let date = HeaderValue::from_str(&date).map_err(|e| AzureError::Parse {
            message: format!("invalid date header: {}", e),
        })?;
        headers.insert(MS_DATE, date);
        headers.insert(MS_VERSION, HeaderValue::from_static(API_VERSION));

        let content_length = body.as_ref().map(Vec::len).unwrap_or(0);

        match &self.auth {
            Authorizer::SharedKey(signer) => {
                let value = signer.authorization(&method, &url, &headers, content_length)?;
                let value = HeaderValue::from_str(&value).map_err(|_| AzureError::Auth {
                    message: "Invalid authorization header".to_string(),
                })?;
                headers.insert(AUTHORIZATION, value);
            }
            Authorizer::Sas(sas) => {
                let query = match url.query() {
                    Some(existing) if !existing.is_empty() => format!("{}&{}", existing, sas),
                    _ => sas.clone(),
                };
                url.set_query(Some(&query));
            }
        }

        tracing::debug!(method = %method, path = %url.path(), "blob service request");

        let mut request = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        Err(Self::error_from_response(response).await)
    }

    async fn error_from_response(response: Response) -> AzureError {
        let status = response.status();
        let header_code = response
            .headers()
            .get(MS_ERROR_CODE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response.text().await.unwrap_or_default();
        let parsed = ErrorBody::parse(&body);

        let code = header_code
            .or_else(|| parsed.code.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        let message = parsed.summary().unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        if status == StatusCode::UNAUTHORIZED || AUTH_ERROR_CODES.contains(&code.as_str()) {
            return AzureError::Auth { message };
        }

        AzureError::Api {
            status: status.as_u16(),
            code,
            message,
        }
    }
}

impl std::fmt::Debug for AzureBlobClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureBlobClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("credential", &"[REDACTED]")
            .finish()
    }
}
