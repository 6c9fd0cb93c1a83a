pub mod algorithm;
pub mod assembler;
pub mod runner;
