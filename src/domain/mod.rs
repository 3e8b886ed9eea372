//! Domain rules that hold regardless of transport: card link derivation, QR
//! codes for those links and form validation.

pub mod cards;
pub mod error;
pub mod qr;
pub mod validation;
