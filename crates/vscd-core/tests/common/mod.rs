#![allow(dead_code)]

pub mod fakes;
pub mod script_server;
