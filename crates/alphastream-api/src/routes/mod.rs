pub mod health;
pub mod market;
pub mod news;
pub mod portfolio;
pub mod status;
pub mod stocks;
pub mod universe;
