//! Dioxus components for the attachments pages.
//!
//! Every component links its own stylesheet, so pages only import the
//! components they render.

pub mod components;

pub use components::*;
