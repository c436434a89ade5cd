pub mod demo;
pub mod schema;
pub mod search;
