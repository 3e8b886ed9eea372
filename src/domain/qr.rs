//! QR codes for card links.
//!
//! Codes use error-correction level M, the standard 4-module quiet zone,
//! black on white, and are rendered at least [`QR_MIN_SIZE`] pixels square.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use qrcode::{
    EcLevel, QrCode,
    render::{svg, unicode},
};
use serde::Serialize;

use super::cards::CardLinks;
use super::error::DomainError;

pub const QR_MIN_SIZE: u32 = 400;

const DARK: &str = "#000000";
const LIGHT: &str = "#ffffff";

/// One encoded URL in the two forms the console hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrImage {
    pub url: String,
    /// Modules per side, quiet zone excluded.
    pub modules: usize,
    pub svg: String,
    #[serde(skip)]
    terminal: String,
}

impl QrImage {
    pub fn encode(url: &str) -> Result<Self, DomainError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DomainError::validation("QR code needs a url"));
        }
        let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::M)
            .map_err(|err| DomainError::validation(format!("url cannot be encoded as QR: {err}")))?;

        let svg = code
            .render::<svg::Color<'_>>()
            .min_dimensions(QR_MIN_SIZE, QR_MIN_SIZE)
            .dark_color(svg::Color(DARK))
            .light_color(svg::Color(LIGHT))
            .build();
        // Inverted so the code scans from a dark terminal background.
        let terminal = code
            .render::<unicode::Dense1x2>()
            .dark_color(unicode::Dense1x2::Light)
            .light_color(unicode::Dense1x2::Dark)
            .build();

        Ok(Self {
            url: url.to_string(),
            modules: code.width(),
            svg,
            terminal,
        })
    }

    /// `data:` URL suitable for an `<img src>`.
    pub fn data_url(&self) -> String {
        format!("data:image/svg+xml;base64,{}", STANDARD.encode(self.svg.as_bytes()))
    }

    /// Half-block rendering for a terminal.
    pub fn terminal(&self) -> &str {
        &self.terminal
    }
}

/// QR codes for both links of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardQrCodes {
    pub public: QrImage,
    pub private: QrImage,
}

impl CardQrCodes {
    pub fn for_links(links: &CardLinks) -> Result<Self, DomainError> {
        Ok(Self {
            public: QrImage::encode(&links.public_url)?,
            private: QrImage::encode(&links.private_url)?,
        })
    }
}
