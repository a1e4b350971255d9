//! Test Module
//!
//! Integration-level test suite for the StudyBalance backend.
//!
//! ## Test Categories
//! - `brain_tests`: end-to-end response selection through the composer
//! - `database_tests`: CRUD operations for users, chats, reminders, feedback
//! - `engine_tests`: provider calls, silent fallback, bounded memory
//! - `routes_tests`: HTTP handlers over a real loopback server

pub mod brain_tests;
pub mod engine_tests;
