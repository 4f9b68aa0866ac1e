pub mod course_resolver;
pub mod identity_resolver;
pub mod item_enumerator;

pub use course_resolver::CourseResolver;
pub use identity_resolver::IdentityResolver;
pub use item_enumerator::ItemEnumerator;
