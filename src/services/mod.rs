// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external collaborators.

pub mod identity;
pub mod push;

pub use identity::{AuthProvider, FirebaseAuth, MemoryAuth};
pub use push::PushRegistry;
