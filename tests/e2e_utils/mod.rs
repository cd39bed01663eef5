#![cfg(test)]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod build_server;

pub use build_server::TestBuildServer;
