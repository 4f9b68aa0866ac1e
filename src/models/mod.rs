pub mod course;
pub mod session;

pub use course::{CourseId, CourseReference, Item, UserId};
pub use session::{build_cookie, ClientIdentity, Credentials, Session};
