pub mod actor;
pub mod common;
pub mod layout;
pub mod sys;
