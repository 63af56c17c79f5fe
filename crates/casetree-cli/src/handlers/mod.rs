pub mod catalog;
pub mod configure;
pub mod show;
