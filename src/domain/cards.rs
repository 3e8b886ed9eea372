//! QR card kinds and the public/private URLs encoded into their QR codes.

use std::fmt;

use imanage_api_types::ResultRecord;

use super::error::DomainError;

/// Card kind as reported in a record's `cardType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardType {
    IShop,
    IPet,
    IMember,
    IDoc,
    IStand,
    /// Plain identity card; also the fallback for unknown or missing types.
    ICard,
}

impl CardType {
    pub const SHOP_WIRE: &'static str = "CARD_TYPE.ISHOP";

    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("CARD_TYPE.ISHOP") => CardType::IShop,
            Some("CARD_TYPE.IPET") => CardType::IPet,
            Some("CARD_TYPE.IMEMBER") => CardType::IMember,
            Some("CARD_TYPE.IDOC") => CardType::IDoc,
            Some("CARD_TYPE.ISTAND") => CardType::IStand,
            _ => CardType::ICard,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            CardType::IShop => Self::SHOP_WIRE,
            CardType::IPet => "CARD_TYPE.IPET",
            CardType::IMember => "CARD_TYPE.IMEMBER",
            CardType::IDoc => "CARD_TYPE.IDOC",
            CardType::IStand => "CARD_TYPE.ISTAND",
            CardType::ICard => "CARD_TYPE.ICARD",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CardType::IShop => "iShop",
            CardType::IPet => "iPet",
            CardType::IMember => "iMember",
            CardType::IDoc => "iDoc",
            CardType::IStand => "iStand",
            CardType::ICard => "iCard",
        }
    }

    pub fn is_shop(self) -> bool {
        self == CardType::IShop
    }

    /// Console route showing the record's detail view.
    pub fn detail_route(self, id: &str) -> String {
        if self.is_shop() {
            format!("/detail/ishop/{id}")
        } else {
            format!("/detail/{id}")
        }
    }

    fn link_patterns(self) -> (&'static str, &'static str) {
        match self {
            CardType::IShop => ("/s/{id}/i/0/p/{p}", "/s-edit/{id}/p/{p}"),
            CardType::IPet => ("/p/{id}/p/{p}", "/pet-edit/{id}/p/{p}"),
            CardType::IMember => ("/m/{id}/p/{p}", "/m-edit/{id}/p/{p}"),
            CardType::IDoc | CardType::IStand => ("/id/{id}/i/0/p/{p}", "/id-edit/{id}/p/{p}"),
            CardType::ICard => ("/n/{id}/p/{p}", "/edit-card/{id}/p/{p}"),
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Public (view) and private (edit) URLs for one card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CardLinks {
    pub public_url: String,
    pub private_url: String,
}

impl CardLinks {
    pub fn derive(
        base_url: &str,
        card_type: CardType,
        id: &str,
        private_code: &str,
    ) -> Result<Self, DomainError> {
        let id = id.trim();
        let private_code = private_code.trim();
        if id.is_empty() {
            return Err(DomainError::validation("card id is required"));
        }
        if private_code.is_empty() {
            return Err(DomainError::validation("card has no private code"));
        }

        let base = base_url.trim_end_matches('/');
        let (public, private) = card_type.link_patterns();
        let fill = |pattern: &str| {
            format!(
                "{base}{}",
                pattern.replace("{id}", id).replace("{p}", private_code)
            )
        };

        Ok(Self {
            public_url: fill(public),
            private_url: fill(private),
        })
    }

    pub fn for_record(base_url: &str, record: &ResultRecord) -> Result<Self, DomainError> {
        let private_code = record
            .private_code
            .as_deref()
            .ok_or_else(|| DomainError::validation("card has no private code"))?;
        Self::derive(
            base_url,
            CardType::from_wire(record.card_type.as_deref()),
            &record.id,
            private_code,
        )
    }
}
