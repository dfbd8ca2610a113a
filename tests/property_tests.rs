// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify the idempotence and dry-run
//! properties every reconcile module must satisfy, and the row-to-host
//! mapping of the inventory.

mod fixtures;
mod property;
