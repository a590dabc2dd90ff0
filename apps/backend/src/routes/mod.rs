//! HTTP handlers

pub mod generate;
pub mod grade;
pub mod quiz;
pub mod sources;
