//! Database entity definitions (row mappings).

pub mod contribution;
pub mod item;
pub mod reservation;
pub mod user;
pub mod wishlist;

pub use contribution::ContributionEntity;
pub use item::ItemEntity;
pub use reservation::ReservationEntity;
pub use user::UserEntity;
pub use wishlist::WishlistEntity;
