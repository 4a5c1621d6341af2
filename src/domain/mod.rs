//! Records, field rules and typed query parameters.

pub mod contact;
pub mod jewelry_type;
pub mod query;

pub use contact::{Contact, ContactInput, ContactStatus, ContactStatusInput, NewContact};
pub use jewelry_type::{JewelryType, JewelryTypeChanges, JewelryTypeInput, NewJewelryType};
pub use query::{
    ContactFilter, ContactQuery, JewelryTypeFilter, JewelryTypeQuery, Page, PageRequest,
    Pagination, SortDirection, SortField, SortSpec,
};
