pub mod document;
pub mod review;
