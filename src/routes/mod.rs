pub mod pages;
pub mod public;
