pub mod enums;
pub mod patient;
pub mod patient_file;
pub mod user;
pub mod visit;

pub use patient::*;
pub use patient_file::*;
pub use user::*;
pub use visit::*;
