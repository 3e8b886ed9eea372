use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::cards::CardType;

use super::predicate::{Predicate, Projection};

/// Which records a search covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchKind {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "ishop")]
    ShopOnly,
    #[serde(rename = "icard")]
    CardOnly,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::All => "all",
            SearchKind::ShopOnly => "ishop",
            SearchKind::CardOnly => "icard",
        }
    }

    /// Fields requested for a result page of this kind.
    pub fn projection(self) -> Projection {
        match self {
            SearchKind::All => {
                Projection::of(&["id", "ownerName", "private", "cardType", "packageId"])
            }
            SearchKind::ShopOnly => Projection::of(&["id", "ownerName", "private"]),
            SearchKind::CardOnly => Projection::of(&["id", "ownerName", "private", "cardType"]),
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(SearchKind::All),
            "ishop" => Ok(SearchKind::ShopOnly),
            "icard" => Ok(SearchKind::CardOnly),
            other => Err(format!("unknown search type `{other}`")),
        }
    }
}

/// Kind plus free text; the text must be non-blank before a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SearchFilter {
    pub kind: SearchKind,
    pub text: String,
}

impl SearchFilter {
    pub fn new(kind: SearchKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// `id LIKE %text% OR ownerName ILIKE %text%`, narrowed by kind.
    pub fn predicate(&self) -> Predicate {
        let pattern = format!("%{}%", self.text.trim());
        let text_match = Predicate::or([
            Predicate::like("id", pattern.clone()),
            Predicate::ilike("ownerName", pattern),
        ]);

        match self.kind {
            SearchKind::All => text_match,
            SearchKind::ShopOnly => Predicate::and([
                Predicate::eq("cardType", CardType::SHOP_WIRE),
                text_match,
            ]),
            SearchKind::CardOnly => Predicate::and([
                Predicate::neq("cardType", CardType::SHOP_WIRE),
                text_match,
            ]),
        }
    }
}
