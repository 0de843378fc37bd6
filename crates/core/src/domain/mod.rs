pub mod contract;
pub mod message;
pub mod portfolio;
