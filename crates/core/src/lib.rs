#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod language;
pub mod session;
pub mod swap;
pub mod translate;
