//! Domain layer types and invariants.

pub mod entities;
pub mod filter;
pub mod window;

pub use entities::{NewSubject, SubjectRecord};
pub use filter::SubjectFilter;
pub use window::StatWindow;
