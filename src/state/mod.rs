/// State management module
///
/// This module handles all application state, including:
/// - The selected image and its loader (data.rs)
/// - The upload-and-generate workflow and its submission lifecycle (workflow.rs)

pub mod data;
pub mod workflow;
