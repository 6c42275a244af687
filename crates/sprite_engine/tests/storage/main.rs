//! Persistence and export tests that touch the real filesystem.

mod store_tests;
