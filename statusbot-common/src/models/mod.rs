pub mod binding;
pub mod message;
pub mod status;
