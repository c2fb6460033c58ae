//! handmarker – hand-landmark swipe and pinch-cursor gestures.
//!
//! Landmarks from an external hand detector are mapped into a viewport,
//! checked for a thumb/index pinch, and turned into left/right swipes and
//! relative cursor motion by [`engine::GestureEngine`].

pub mod actuator;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod event;
pub mod landmark;
pub mod logging;
pub mod manager;
pub mod mapper;
pub mod pinch;
pub mod source;
pub mod swipe;
