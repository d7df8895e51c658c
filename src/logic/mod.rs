// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Side-effectful building blocks: catalog loading, image fetching, and zip assembly.

pub mod archive;
pub mod catalog;
pub mod fetch;
