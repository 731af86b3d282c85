pub mod lookups;
pub mod offices;
pub mod users;

pub use lookups::LookupService;
pub use offices::OfficeService;
pub use users::UserService;
