//! Typed filter grammar of the search backend.
//!
//! The backend accepts a JSON `filter` query parameter:
//!
//! ```json
//! { "where": { "or": [ { "id": { "like": "%7%" } } ] },
//!   "fields": { "id": true }, "skip": 20, "limit": 20 }
//! ```

use serde::{
    Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};
use serde_json::Value;

use super::filter::SearchFilter;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq { field: String, value: Value },
    Neq { field: String, value: Value },
    Like { field: String, pattern: String },
    ILike { field: String, pattern: String },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Neq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::Like {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::ILike {
            field: field.into(),
            pattern: pattern.into(),
        }
    }

    pub fn and(parts: impl IntoIterator<Item = Predicate>) -> Self {
        Self::And(parts.into_iter().collect())
    }

    pub fn or(parts: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or(parts.into_iter().collect())
    }
}

struct Operator<'a, V: ?Sized>(&'static str, &'a V);

impl<V: Serialize + ?Sized> Serialize for Operator<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

struct Clauses<'a>(&'a [Predicate]);

impl Serialize for Clauses<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for clause in self.0 {
            seq.serialize_element(clause)?;
        }
        seq.end()
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Predicate::Eq { field, value } => map.serialize_entry(field, value)?,
            Predicate::Neq { field, value } => {
                map.serialize_entry(field, &Operator("neq", value))?
            }
            Predicate::Like { field, pattern } => {
                map.serialize_entry(field, &Operator("like", pattern.as_str()))?
            }
            Predicate::ILike { field, pattern } => {
                map.serialize_entry(field, &Operator("ilike", pattern.as_str()))?
            }
            Predicate::And(parts) => map.serialize_entry("and", &Clauses(parts))?,
            Predicate::Or(parts) => map.serialize_entry("or", &Clauses(parts))?,
        }
        map.end()
    }
}

/// Field selection; serialized as `{ "field": true, … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<&'static str>,
}

impl Projection {
    pub fn of(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.to_vec(),
        }
    }

    /// Identifier only; used for counting.
    pub fn ids() -> Self {
        Self::of(&["id"])
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(field, &true)?;
        }
        map.end()
    }
}

/// Complete `filter` parameter of one search request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilter {
    #[serde(rename = "where")]
    pub predicate: Predicate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl QueryFilter {
    /// Every match, identifiers only. The total is the length of the returned array.
    pub fn count(filter: &SearchFilter) -> Self {
        Self {
            predicate: filter.predicate(),
            fields: Some(Projection::ids()),
            skip: None,
            limit: None,
        }
    }

    /// One page (1-based) of `page_size` records.
    pub fn page(filter: &SearchFilter, page: u32, page_size: u32) -> Self {
        Self {
            predicate: filter.predicate(),
            fields: Some(filter.kind.projection()),
            skip: Some(u64::from(page.saturating_sub(1)) * u64::from(page_size)),
            limit: Some(page_size),
        }
    }

    pub fn to_query_param(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::filter::SearchKind;
    use super::*;

    #[test]
    fn count_filter_projects_ids_without_paging() {
        let filter = SearchFilter::new(SearchKind::All, "lan");
        let json = serde_json::to_value(QueryFilter::count(&filter)).expect("json");
        assert_eq!(json["fields"], json!({ "id": true }));
        assert!(json.get("skip").is_none());
        assert!(json.get("limit").is_none());
        assert_eq!(json["where"]["or"][1], json!({ "ownerName": { "ilike": "%lan%" } }));
    }

    #[test]
    fn page_filter_skips_previous_pages() {
        let filter = SearchFilter::new(SearchKind::ShopOnly, "tea");
        let query = QueryFilter::page(&filter, 3, 20);
        assert_eq!(query.skip, Some(40));
        assert_eq!(query.limit, Some(20));

        let json = serde_json::to_value(&query).expect("json");
        assert_eq!(
            json["fields"],
            json!({ "id": true, "ownerName": true, "private": true })
        );
    }

    #[test]
    fn eq_serializes_bare_value() {
        let json = serde_json::to_string(&Predicate::eq("status", "ACTIVE")).expect("json");
        assert_eq!(json, r#"{"status":"ACTIVE"}"#);
    }
}
