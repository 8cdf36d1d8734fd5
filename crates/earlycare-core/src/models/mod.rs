pub mod profile;
pub mod result;
pub mod submission;
pub mod tip;
