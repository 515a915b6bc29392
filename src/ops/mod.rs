pub mod controller;
pub mod search;
