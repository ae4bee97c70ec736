//! # template_board
//!
//! Reusable templates, each owning a kanban board of tasks.
//!
//! A [`store::RemoteStore`] is the single cache and mutation gateway in front
//! of a [`backend::Backend`]: either a local JSON file ([`backend::FileBackend`])
//! or a remote JSON API ([`backend::HttpBackend`]). Views never write to the
//! cache directly; they call the store and regroup when it broadcasts a
//! [`store::StoreEvent`].
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a template and a few tasks
//! tb template create Daily -d "Tasks to do every day"
//! tb task add Daily "Stretch"
//! tb task add Daily "Inbox zero" --status doing
//!
//! # Open the home screen, or jump straight to a board
//! tb ui
//! tb board Daily
//!
//! # Use a remote API instead of ~/.template_board/board.json
//! tb --api-url http://localhost:3333 ui
//! ```

pub mod backend;
pub mod board;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod context;
pub mod error;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod tui;
