//! Repository implementations.

pub mod contribution;
pub mod item;
pub mod reservation;
pub mod user;
pub mod wishlist;

pub use contribution::{ContributeOutcome, ContributionRepository, NewContribution};
pub use item::{ItemRepository, NewItem, UpdateItem};
pub use reservation::{CancelOutcome, NewReservation, ReservationRepository};
pub use user::UserRepository;
pub use wishlist::{NewWishlist, UpdateWishlist, WishlistRepository};
