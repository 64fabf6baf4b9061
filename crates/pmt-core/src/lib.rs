//! # pmt-core
//!
//! Core types and the pure half of the task mutation engine for PMT.
//!
//! This crate provides the foundational types shared across all PMT crates:
//! - Entity structs (users, projects, tasks, task history)
//! - Status and priority enums with parse-or-default semantics
//! - ID prefix constants
//! - `Patch<T>` for partial update requests
//! - The field differ, the task mutator, and change-log formatting
//! - Response views returned to transport callers

pub mod changelog;
pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod mutator;
pub mod patch;
pub mod responses;
