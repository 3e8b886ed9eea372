//! Cached services over the console API.

mod cached;
pub mod cards;
pub mod community;
pub mod console;
pub mod keys;
pub mod shops;

pub use cards::CardService;
pub use community::CommunityService;
pub use console::Console;
pub use shops::ShopService;
