use serde::Deserialize;

/// Reference payload Redmine embeds for related records, normally
/// `{"id": 7, "name": "..."}`. Both fields are kept optional so a sparse
/// or legacy payload still deserializes.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedRef {
    /// Returns the display name, trimmed, when one is present and non-empty.
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::NamedRef;

    #[test]
    fn label_trims_and_rejects_empty_names() {
        let named: NamedRef = serde_json::from_str(r#"{"id": 3, "name": "  Design  "}"#).unwrap();
        assert_eq!(named.label(), Some("Design"));

        let blank: NamedRef = serde_json::from_str(r#"{"id": 4, "name": "   "}"#).unwrap();
        assert_eq!(blank.label(), None);

        let missing: NamedRef = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert_eq!(missing.label(), None);
    }
}
