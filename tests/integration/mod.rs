//! Integration tests for the in-memory repository

mod builder_dsl;
mod cli_commands;
mod dirty_tracking;
mod fixture_files;
mod resource_view;
mod session_ops;
