//! Entity models
//!
//! Each entity follows the same shape: the record itself plus `*Create` /
//! `*Update` payload structs for the API layer.

mod activity_log;
mod dining_table;
mod kitchen_ticket;
mod menu;
mod rating;
mod restaurant;
mod staff;
mod waiter_call;

pub use activity_log::{ActivityAction, ActivityEntry};
pub use dining_table::{DiningTable, DiningTableCreate, TableStatus};
pub use kitchen_ticket::{KitchenTicket, TicketItem, TicketStatus};
pub use menu::{
    MenuCategory, MenuCategoryCreate, MenuCategoryUpdate, MenuItem, MenuItemAddon,
    MenuItemCreate, MenuItemUpdate,
};
pub use rating::{Rating, RatingCreate};
pub use restaurant::{Restaurant, RestaurantCreate};
pub use staff::{Staff, StaffCreate, StaffRole, StaffUpdate};
pub use waiter_call::{CallStatus, WaiterCall};
