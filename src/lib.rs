pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
