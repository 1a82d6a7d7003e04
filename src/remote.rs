use serde::{Deserialize, Serialize};

use crate::terraform::STATE_FILE_NAME;

/// A blob as reported by a container listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoteBlob {
    pub name: String,
    pub size: u64,
}

impl RemoteBlob {
    pub fn is_state_file(&self) -> bool {
        self.name.ends_with(STATE_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(name: &str) -> RemoteBlob {
        RemoteBlob {
            name: name.to_string(),
            size: 10,
        }
    }

    #[test]
    fn test_is_state_file() {
        assert!(blob("10-net/terraform.tfstate").is_state_file());
        assert!(blob("terraform.tfstate").is_state_file());
        assert!(!blob("10-net/terraform.tfstate.backup").is_state_file());
        assert!(!blob("10-net/main.tf").is_state_file());
    }

    #[test]
    fn test_remote_blob_serialization() {
        let json = serde_json::to_string(&blob("dev/terraform.tfstate")).unwrap();
        assert_eq!(json, r#"{"name":"dev/terraform.tfstate","size":10}"#);
    }
}
