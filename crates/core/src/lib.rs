//! Domain core for the font upload and SVG text rendering service.
//!
//! Everything in this crate is pure: it operates on byte slices and
//! strings and never touches the filesystem or the network. Storage lives
//! in `fontsvg-db`, HTTP in `fontsvg-api`.

pub mod error;
pub mod fallback;
pub mod font;
pub mod format;
pub mod naming;
pub mod render;
pub mod sfnt;
pub mod size;
pub mod types;
pub mod validator;
pub mod woff;
pub mod woff2;

#[cfg(test)]
pub(crate) mod fixtures;
