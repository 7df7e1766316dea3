pub mod catalog;
pub mod export;
pub mod health;
pub mod interview;
