// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module

mod inventory_rows;
mod reconcile_properties;
