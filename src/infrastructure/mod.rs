pub mod cache;
pub mod config;
pub mod db;
pub mod fetch;
pub mod http;
pub mod repositories;
