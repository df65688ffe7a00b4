// ABOUTME: Re-exports helper modules for xaze-cli
// ABOUTME: Provides terminal display formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

pub mod display;
