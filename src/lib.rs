//! Virta is a chat client for a remote course question-answering service.
//! The UI-free core (transcript, storage, request mediation, rendering,
//! session control) lives in the plain modules and is testable headless; the
//! Dioxus front end is compiled in when a renderer feature is enabled.

pub mod api;
pub mod attachment;
pub mod export;
pub mod render;
pub mod session;
pub mod storage;
pub mod theme;
pub mod transcript;
pub mod types;

#[cfg(any(feature = "web", feature = "desktop", feature = "mobile"))]
pub mod ui;
#[cfg(any(feature = "web", feature = "desktop", feature = "mobile"))]
pub mod views;
