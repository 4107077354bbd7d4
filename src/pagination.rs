//! Shared page arithmetic for every admin listing.
//!
//! Stores count the filtered collection and fetch one `LIMIT/OFFSET` slice under the
//! same filter, then wrap both in a [`Page`].

use serde::{de, Deserialize, Deserializer};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw `?page=&limit=&search=` query string.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Blank query values (`?page=`) read as absent; anything else must be an integer.
pub fn empty_as_none<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer `{v}`"))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
}

impl From<PageQuery> for PageRequest {
    fn from(q: PageQuery) -> Self {
        Self::new(q.page, q.limit, q.search)
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>, search: Option<String>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// `%term%` for ILIKE, with LIKE metacharacters escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.search.as_deref().map(|s| {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('%');
            for c in s.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('%');
            out
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, req: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: req.page,
            limit: req.limit,
        }
    }

    pub fn total_pages(&self) -> i64 {
        total_pages(self.total, self.limit)
    }

    /// Slice an already filtered and ordered collection.
    #[cfg(test)]
    pub fn from_slice(all: &[T], req: &PageRequest) -> Self
    where
        T: Clone,
    {
        let start = usize::try_from(req.offset()).unwrap_or(usize::MAX);
        let items = all
            .iter()
            .skip(start)
            .take(req.limit as usize)
            .cloned()
            .collect();
        Self::new(items, all.len() as i64, req)
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
