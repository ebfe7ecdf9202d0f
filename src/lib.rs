// src/lib.rs

//! Rozklad schedule parser library
//!
//! Turns rozklad.kpi.ua group schedule pages into structured timetables,
//! reconciling cells whose subject, teacher and room lists disagree.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
