pub mod bootstrap;
pub mod memory;
pub mod postgres;
