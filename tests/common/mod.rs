#![allow(dead_code)]

pub mod factories;
pub mod strategies;

#[allow(unused_imports)]
pub use factories::*;
