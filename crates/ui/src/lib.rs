#![deny(unsafe_code)]

/// Product showcase for the Parlor CRM chat widget.
///
/// This crate provides a desktop landing page built with GPUI and
/// gpui-component, embedding a live demo panel that exercises the injected
/// send capability and mirrors every attempt into a simulated network log.
pub mod app;
/// Demo interaction panel: transcript, network log, send orchestration.
pub mod demo;
/// Landing page sections.
pub mod landing;
/// Startup configuration and theme application.
pub mod settings;

/// Returns a stable marker used by integration smoke tests.
pub fn smoke_marker() -> &'static str {
    "parlor"
}
