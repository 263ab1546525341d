//! Terminal UI module using ratatui.
//!
//! This module provides the TUI rendering and input handling:
//!
//! - `render`: Main frame rendering, layout and overlays
//! - `input`: Keyboard event handling
//! - `styles`: Color schemes and text styling
//! - `pages`: One renderer per routed page
//! - `widgets`: Shared pieces (forms, centered dialogs)

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
pub mod widgets;
