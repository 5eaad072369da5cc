//! Entity repositories
//!
//! One repository per entity, each owning its redb table definition.
//! The dining-table, ticket, call and activity stores live with their
//! domain modules instead (`tables`, `tickets`, `calls`, `audit`).

mod menu;
mod rating;
mod restaurant;
mod staff;

pub use menu::{MenuCategoryRepository, MenuItemRepository};
pub use rating::RatingRepository;
pub use restaurant::RestaurantRepository;
pub use staff::StaffRepository;
