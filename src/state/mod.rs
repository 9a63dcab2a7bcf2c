/// State management module
///
/// This module handles all application state, including:
/// - The ordered image selection (selection.rs)
/// - Shared data structures (data.rs)
/// - Drag-and-drop reordering (drag.rs)
/// - The session that owns all of the above plus the export phase (session.rs)

pub mod data;
pub mod drag;
pub mod selection;
pub mod session;
