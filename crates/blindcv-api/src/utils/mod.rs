pub mod flash;
pub mod upload;
