//! Search state carried in the console URL (`/search?q=&type=&page=`).

use url::form_urlencoded;

use super::filter::{SearchFilter, SearchKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub filter: SearchFilter,
    pub page: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            filter: SearchFilter::default(),
            page: 1,
        }
    }
}

impl SearchQuery {
    pub fn new(filter: SearchFilter, page: u32) -> Self {
        Self {
            filter,
            page: page.max(1),
        }
    }

    /// Parse `q`, `type` and `page`. Unknown types read as `all`; missing,
    /// zero or malformed pages read as 1. A leading `?` is ignored.
    pub fn from_query_string(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        let mut query = Self::default();
        for (name, value) in form_urlencoded::parse(input.as_bytes()) {
            match name.as_ref() {
                "q" => query.filter.text = value.into_owned(),
                "type" => query.filter.kind = value.parse().unwrap_or_default(),
                "page" => query.page = value.trim().parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                _ => {}
            }
        }
        query
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("q", &self.filter.text)
            .append_pair("type", self.filter.kind.as_str())
            .append_pair("page", &self.page.to_string())
            .finish()
    }

    pub fn kind(&self) -> SearchKind {
        self.filter.kind
    }
}
