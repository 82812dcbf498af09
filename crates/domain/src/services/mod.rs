//! Business logic services.

pub mod funding;
pub mod gifting;
pub mod realtime;

pub use gifting::GiftingError;
pub use realtime::ChannelRegistry;
