pub mod contact_service;
pub mod jewelry_type_service;

pub use contact_service::ContactService;
pub use jewelry_type_service::JewelryTypeService;
