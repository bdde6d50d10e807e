//! Repository layer: entity-scoped database operations.
//!
//! Each function runs against a borrowed `Connection`; callers that need
//! several statements to land together pass a `Transaction` (which derefs
//! to `Connection`). Validation happens before these are reached.

mod patient;
mod patient_file;
mod user;
mod visit;

pub use patient::*;
pub use patient_file::*;
pub use user::*;
pub use visit::*;
