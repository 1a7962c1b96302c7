pub mod card;
pub mod config;
pub mod diagnostic;
pub mod markup;
