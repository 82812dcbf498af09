//! Domain model definitions.

pub mod contribution;
pub mod events;
pub mod item;
pub mod metadata;
pub mod reservation;
pub mod user;
pub mod wishlist;

pub use contribution::Contribution;
pub use events::WishlistEvent;
pub use item::{GuestItemView, Item, OwnerItemView};
pub use metadata::UrlMetadata;
pub use reservation::Reservation;
pub use user::User;
pub use wishlist::{GuestWishlistView, OwnerWishlistView, Wishlist};
