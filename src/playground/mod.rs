// ABOUTME: API-key scoped chat playground: transcript model and the job poller
// ABOUTME: Shared by the console's playground routes and the CLI chat command
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Turn controller and cancellable job polling
pub mod poller;
/// Controllers shared by console requests
pub mod registry;
/// Chat bubbles and placeholder handling
pub mod transcript;

pub use poller::{
    ApiKeyChat, ChatBackend, ChatController, ChatError, ChatSnapshot, PollGuard, TurnPhase,
};
pub use registry::{invalid_api_key, ChatRegistry, PlaygroundChat};
pub use transcript::{Bubble, Speaker, Transcript};
