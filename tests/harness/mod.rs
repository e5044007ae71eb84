#![allow(dead_code)]

pub mod adapter_server;
pub mod temp_db;
