use serde::Serialize;

/// Mutations applied to the inventory.
///
/// Serializes as a flat record, e.g. `{"change":"issued","isbn":"111"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "change", rename_all = "lowercase")]
pub enum InventoryChange {
    /// A book was appended to the catalog
    Added {
        /// ISBN of the new book
        isbn: String,
    },
    /// An available book was lent out
    Issued {
        /// ISBN of the issued book
        isbn: String,
    },
    /// An issued book came back
    Returned {
        /// ISBN of the returned book
        isbn: String,
    },
}

impl InventoryChange {
    /// ISBN of the book the change applies to
    #[must_use]
    pub fn isbn(&self) -> &str {
        match self {
            Self::Added { isbn } | Self::Issued { isbn } | Self::Returned { isbn } => isbn,
        }
    }

    /// Short verb describing the change
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::Issued { .. } => "issued",
            Self::Returned { .. } => "returned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_serializes_flat() -> Result<(), serde_json::Error> {
        let change = InventoryChange::Issued { isbn: "111".to_string() };
        assert_eq!(serde_json::to_string(&change)?, r#"{"change":"issued","isbn":"111"}"#);

        let change = InventoryChange::Returned { isbn: "222".to_string() };
        assert_eq!(serde_json::to_string(&change)?, r#"{"change":"returned","isbn":"222"}"#);
        Ok(())
    }

    #[test]
    fn test_accessors() {
        let change = InventoryChange::Added { isbn: "333".to_string() };
        assert_eq!(change.isbn(), "333");
        assert_eq!(change.verb(), "added");
    }
}
