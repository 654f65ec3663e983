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

//! Wire types of the user identity service.
//!
//! Request bodies, response payloads and the `APIResponse` envelope shared by
//! the service, the web frontend and sibling services. Depends on `serde` only.

pub mod error;
pub mod requests;
pub mod responses;

pub use error::APIError;
pub use responses::APIResponse;
