pub mod coursera_client;

pub use coursera_client::CourseraClient;
