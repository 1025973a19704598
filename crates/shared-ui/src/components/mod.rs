// Standalone components
pub mod alert;
pub mod badge;
pub mod button;
pub mod card;
pub mod data_table;
pub mod page_header;
pub mod skeleton;

// Primitive wrappers
pub mod toast;

pub use alert::*;
pub use badge::*;
pub use button::*;
pub use card::*;
pub use data_table::*;
pub use page_header::*;
pub use skeleton::*;
pub use toast::*;
