use serde::Deserialize;

use super::AzureError;
use crate::remote::RemoteBlob;

pub const API_VERSION: &str = "2021-08-06";

/// Body of a List Containers response.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerEnumeration {
    #[serde(default)]
    pub containers: ContainerList,
    #[serde(default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ContainerList {
    #[serde(rename = "Container", default)]
    pub items: Vec<ContainerItem>,
}

#[derive(Debug, Deserialize)]
pub struct ContainerItem {
    #[serde(rename = "Name")]
    pub name: String,
}

/// Body of a List Blobs response.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct BlobEnumeration {
    #[serde(default)]
    pub blobs: BlobList,
    #[serde(default)]
    pub next_marker: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BlobList {
    #[serde(rename = "Blob", default)]
    pub items: Vec<BlobItem>,
}

#[derive(Debug, Deserialize)]
pub struct BlobItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Properties", default)]
    pub properties: BlobProperties,
}

#[derive(Debug, Deserialize, Default)]
pub struct BlobProperties {
    #[serde(rename = "Content-Length", default)]
    pub content_length: Option<u64>,
}

impl BlobItem {
    pub fn into_remote_blob(self) -> RemoteBlob {
        RemoteBlob {
            name: self.name,
            size: self.properties.content_length.unwrap_or(0),
        }
    }
}

/// `<Error><Code/><Message/></Error>` returned on failed requests.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Lenient: an unparseable or empty body yields an empty `ErrorBody`.
    pub fn parse(body: &str) -> Self {
        parse_xml(body).unwrap_or_default()
    }

    /// Azure appends `RequestId:` and `Time:` lines to every message.
    pub fn summary(&self) -> Option<String> {
        self.message
            .as_deref()
            .and_then(|m| m.lines().next())
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

pub fn parse_xml<T>(body: &str) -> Result<T, AzureError>
where
    T: for<'de> Deserialize<'de>,
{
    let body = body.trim_start_matches('\u{feff}');
    quick_xml::de::from_str(body).map_err(|e| AzureError::Parse {
        message: e.to_string(),
    })
}

/// Azure sends `<NextMarker />` on the last page.
pub fn continuation(marker: Option<String>) -> Option<String> {
    marker.filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_container_enumeration() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://acct.blob.core.windows.net/">
  <Containers>
    <Container><Name>logs</Name><Properties><Etag>"0x1"</Etag></Properties></Container>
    <Container><Name>tfstate</Name></Container>
  </Containers>
  <NextMarker />
</EnumerationResults>"#;

        let parsed: ContainerEnumeration = parse_xml(xml).unwrap();
        let names: Vec<_> = parsed.containers.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["logs", "tfstate"]);
        assert_eq!(continuation(parsed.next_marker), None);
    }

    #[test]
    fn test_parse_blob_enumeration_with_marker() {
        let xml = "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<EnumerationResults ServiceEndpoint=\"https://acct.blob.core.windows.net/\" ContainerName=\"tfstate\">\
<Blobs>\
<Blob><Name>10-net/terraform.tfstate</Name><Properties><Content-Length>2048</Content-Length><BlobType>BlockBlob</BlobType></Properties></Blob>\
<Blob><Name>readme.txt</Name><Properties><Content-Length>12</Content-Length></Properties></Blob>\
</Blobs>\
<NextMarker>2!token</NextMarker>\
</EnumerationResults>";

        let parsed: BlobEnumeration = parse_xml(xml).unwrap();
        assert_eq!(parsed.blobs.items.len(), 2);
        let first = parsed.blobs.items.into_iter().next().unwrap().into_remote_blob();
        assert_eq!(first.name, "10-net/terraform.tfstate");
        assert_eq!(first.size, 2048);
        assert_eq!(continuation(parsed.next_marker), Some("2!token".to_string()));
    }

    #[test]
    fn test_parse_empty_blob_list() {
        let xml = r#"<EnumerationResults ContainerName="tfstate"><Blobs /><NextMarker /></EnumerationResults>"#;
        let parsed: BlobEnumeration = parse_xml(xml).unwrap();
        assert!(parsed.blobs.items.is_empty());
    }

    #[test]
    fn test_error_body_summary_uses_first_line() {
        let xml = "<?xml version=\"1.0\" encoding=\"utf-8\"?><Error><Code>ContainerNotFound</Code>\
<Message>The specified container does not exist.\nRequestId:abc\nTime:2026-01-01T00:00:00Z</Message></Error>";
        let body = ErrorBody::parse(xml);
        assert_eq!(body.code.as_deref(), Some("ContainerNotFound"));
        assert_eq!(
            body.summary().as_deref(),
            Some("The specified container does not exist.")
        );
    }

    #[test]
    fn test_error_body_parse_is_lenient() {
        let body = ErrorBody::parse("");
        assert!(body.code.is_none());
        assert!(body.summary().is_none());
    }
}
