/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! User identity service library.
//!
//! This crate provides the Axum router, application state, and configuration
//! for the user service, along with the token subsystem it is built on: JWT
//! decoding and validation, the Cognito code exchange, identity provisioning,
//! and Korean phone number normalization. The binary entry point (`main.rs`)
//! is a thin wrapper that calls into this library.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod login;
pub mod oauth;
pub mod phone;
pub mod routes;
pub mod state;
