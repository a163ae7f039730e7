pub mod analysis;
pub mod page;
