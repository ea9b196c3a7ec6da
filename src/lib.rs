//! # imgshrink
//!
//! Batch image optimizer for a single directory of web assets. Every image at
//! the top level of the source directory is decoded, geometrically
//! transformed, and re-encoded into an output directory, with a one-line size
//! report per file.
//!
//! # Architecture
//!
//! ```text
//! source/  →  discover  →  per file: decode → normalize → policy → encode → write
//!                                                                     ↓
//!                                                          ProcessEvent → stdout
//! ```
//!
//! Two transform policies share the same engine:
//!
//! - **Downscale** (`MaxWidthDownscale`): images wider than a limit shrink to
//!   it, keeping aspect ratio. Narrower images pass through at their size.
//! - **Fit** (`FitExact`): every image becomes exactly `W×H` by scaling to
//!   cover and cropping the center. PNG sources are also rewritten in place.
//!
//! One bad file never stops a batch: each file yields exactly one
//! [`types::ProcessingResult`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discovery`] | Lists candidate images in the source directory (no recursion) |
//! | [`process`] | The transform engine, PNG source sync, and the run loop |
//! | [`imaging`] | Decode, resize, crop, and encode behind [`imaging::ImageBackend`] |
//! | [`config`] | `imgshrink.toml` loading and merging; argument parsing with fallback |
//! | [`types`] | Per-file results, errors, and the serializable batch report |
//! | [`output`] | CLI output formatting: per-file lines and the run summary |
//! | [`logging`] | `tracing` subscriber setup (stderr, text or JSON) |
//!
//! # Design Decisions
//!
//! ## Codecs
//!
//! Decoding, resampling and PNG use the `image` crate. JPEG goes through
//! `jpeg-encoder` with optimized Huffman tables, and WebP through the `webp`
//! crate (libwebp), lossy at the requested quality unless `lossless` is set.
//!
//! ## Deterministic Output
//!
//! Discovery sorts by file name and every encoder is run with fixed settings,
//! so the same inputs and parameters produce byte-identical outputs.

pub mod config;
pub mod discovery;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
