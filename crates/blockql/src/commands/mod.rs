pub mod catalog;
pub mod helpers;
pub mod roots;
pub mod serialize;
pub mod usage;
pub mod validate;
