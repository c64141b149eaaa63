pub mod config;
pub mod controller;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod paths;
pub mod selection;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;
