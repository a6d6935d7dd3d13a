#![deny(warnings)]

pub mod config;
pub mod controller;
pub mod report;
pub mod selection;
pub mod service;
pub mod view;
