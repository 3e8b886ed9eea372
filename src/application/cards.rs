//! QR card records: detail, edits and the public/private links printed on
//! the card.

use imanage_api_types::{CardDetail, CardUpdateRequest, ResultRecord};

use crate::api::{ApiClient, ApiError};
use crate::cache::QueryCache;
use crate::domain::cards::{CardLinks, CardType};
use crate::domain::error::DomainError;
use crate::domain::qr::CardQrCodes;

use super::cached::{invalidate, read};
use super::keys;

#[derive(Debug, Clone)]
pub struct CardService {
    api: ApiClient,
    cache: QueryCache<ApiError>,
    card_base_url: String,
}

impl CardService {
    pub fn new(api: ApiClient, cache: QueryCache<ApiError>, card_base_url: impl Into<String>) -> Self {
        Self {
            api,
            cache,
            card_base_url: card_base_url.into(),
        }
    }

    pub async fn detail(&self, id: &str) -> Result<Option<CardDetail>, ApiError> {
        let (api, id) = (self.api.clone(), id.to_owned());
        read(&self.cache, keys::qrid(&id), async move { api.card_detail(&id).await }).await
    }

    /// Apply `update`; cached search results may list the old owner, so they
    /// are invalidated too.
    pub async fn update(
        &self,
        id: &str,
        update: &CardUpdateRequest,
    ) -> Result<CardDetail, ApiError> {
        let updated = self.api.update_card(id, update).await?;
        invalidate(&self.cache, "update_card", &[keys::qrid(id), keys::qrids()]);
        Ok(updated)
    }

    pub fn links(&self, card: &CardDetail) -> Result<CardLinks, DomainError> {
        let private_code = card
            .private_code
            .as_deref()
            .ok_or_else(|| DomainError::validation("card has no private code"))?;
        CardLinks::derive(
            &self.card_base_url,
            CardType::from_wire(card.card_type.as_deref()),
            &card.id,
            private_code,
        )
    }

    /// QR codes for the card's public and private links.
    pub fn qr_codes(&self, card: &CardDetail) -> Result<CardQrCodes, DomainError> {
        CardQrCodes::for_links(&self.links(card)?)
    }

    pub fn record_links(&self, record: &ResultRecord) -> Result<CardLinks, DomainError> {
        CardLinks::for_record(&self.card_base_url, record)
    }
}
