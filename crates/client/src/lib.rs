//! Client side of the font-to-SVG service.
//!
//! [`session::ClientSession`] ties together the HTTP client, the local font
//! library and user notifications. It uploads fonts, keeps the selectable
//! family list, and produces SVG files, falling back to a locally built
//! `<text>` document whenever the server cannot render.

pub mod api;
pub mod error;
pub mod library;
pub mod notify;
pub mod session;
