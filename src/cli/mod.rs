pub mod currencies;
pub mod interactive;
pub mod setup;
pub mod table;
pub mod ui;
