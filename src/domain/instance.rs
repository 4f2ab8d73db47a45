use std::fmt::Display;

use super::metadata::MetadataError;

/// Placeholder some metadata clients hand back instead of failing.
const UNKNOWN_INSTANCE_ID: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceId(String);

impl TryFrom<String> for InstanceId {
    type Error = MetadataError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let id = raw.trim();

        match id {
            "" => Err(MetadataError::EmptyResponse),
            UNKNOWN_INSTANCE_ID => Err(MetadataError::UnknownInstance),
            _ => Ok(Self(id.to_owned())),
        }
    }
}

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let id = InstanceId::try_from(" i-0123456789abcdef0\n".to_string()).unwrap();
        assert_eq!(id.as_str(), "i-0123456789abcdef0");
    }

    #[test]
    fn rejects_blank_body() {
        assert!(matches!(
            InstanceId::try_from("  \n".to_string()),
            Err(MetadataError::EmptyResponse)
        ));
    }

    #[test]
    fn rejects_unknown_placeholder() {
        assert!(matches!(
            InstanceId::try_from("unknown".to_string()),
            Err(MetadataError::UnknownInstance)
        ));
    }
}
