//! # Core Application Logic
//!
//! This module contains the chat's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │    Sync    │
//!           │  Adapter   │              │ (polling,  │
//!           │ (ratatui)  │              │  reqwest)  │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all chat state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`session`]: The name gate
//! - [`emoji`]: Per-sender glyphs
//! - [`view`]: Message → on-screen description
//! - [`config`]: Settings and their override order

pub mod action;
pub mod config;
pub mod emoji;
pub mod session;
pub mod state;
pub mod view;
