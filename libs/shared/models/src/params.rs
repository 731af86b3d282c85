/// Query axes shared by every list endpoint. A `None` axis is omitted from
/// the request entirely; the backend treats a missing axis as "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub search: Option<String>,
    pub status: Option<bool>,
}

impl ListParams {
    /// No axes set: the backend's full, unfiltered listing.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Self::default()
        }
    }

    /// Caps the result count without paging, as the assignment dialog's
    /// patient search does.
    pub fn limited(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_status(mut self, status: bool) -> Self {
        self.status = Some(status);
        self
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.to_string()));
        }
        query
    }

    /// Canonical text form used as the parameter block of a cache key.
    /// Two parameter sets collide exactly when every axis matches.
    pub fn cache_key(&self) -> String {
        self.to_query()
            .into_iter()
            .map(|(axis, value)| format!("{}={}", axis, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}
