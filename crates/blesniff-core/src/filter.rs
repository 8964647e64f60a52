//! Address filtering for scan results.

/// Case-insensitive substring filter over device addresses.
///
/// The configured substring is lowercased once at construction; candidate
/// addresses are lowercased per match. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct AddressFilter {
    needle: String,
}

impl AddressFilter {
    /// Create a filter matching addresses that contain `needle`,
    /// case-insensitively.
    pub fn new(needle: impl AsRef<str>) -> Self {
        Self {
            needle: needle.as_ref().to_lowercase(),
        }
    }

    /// Create a filter that matches every address.
    pub fn match_all() -> Self {
        Self::default()
    }

    /// Whether any filtering is configured.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The configured substring, lowercased.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Check whether `address` passes the filter.
    pub fn matches(&self, address: &str) -> bool {
        self.needle.is_empty() || address.to_lowercase().contains(&self.needle)
    }
}
