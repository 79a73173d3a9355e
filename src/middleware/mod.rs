// ==============================================================================
// middleware/mod.rs - Gateway Middleware Modules
// ==============================================================================
// Description: Authentication and request processing middleware
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-02-10
// Version: 1.0.0
// ==============================================================================

pub mod auth;

pub use auth::USER_ID_HEADER;
