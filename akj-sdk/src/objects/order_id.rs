use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Opaque identifier correlating one payment attempt across the
/// create-link and verify calls.
///
/// Never empty: construction goes through [`OrderId::new`], which rejects
/// blank input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "CompactString", into = "CompactString")]
pub struct OrderId(CompactString);

impl OrderId {
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(CompactString::from(trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<CompactString> for OrderId {
    type Error = &'static str;

    fn try_from(value: CompactString) -> Result<Self, Self::Error> {
        Self::new(value).ok_or("order id must not be empty")
    }
}

impl From<OrderId> for CompactString {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_order_id_rejected() {
        assert!(OrderId::new("").is_none());
        assert!(OrderId::new("   ").is_none());
        assert_eq!(OrderId::new(" abc123 ").unwrap().as_str(), "abc123");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<OrderId>(r#""""#).is_err());
        let id: OrderId = serde_json::from_str(r#""order_Nx1""#).unwrap();
        assert_eq!(id.to_string(), "order_Nx1");
    }
}
