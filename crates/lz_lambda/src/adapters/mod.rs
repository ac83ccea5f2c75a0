pub mod macie;
pub mod organizations;
pub mod retry;
