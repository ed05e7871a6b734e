//! # qrforge
//!
//! A Rust library for encoding arbitrary bytes into QR Code symbols (ISO/IEC 18004, versions
//! 1 to 40) with Reed-Solomon error correction and penalty driven mask selection.
//!
//! ## Features
//!
//! - **Mixed mode encoding**: Payloads are split into numeric, alphanumeric, byte and optional
//!   Kanji segments, and the smallest version that holds them is chosen automatically
//! - **Reed-Solomon error correction**: Four levels (L, M, Q, H) over GF(2^8)
//! - **Mask selection**: All eight masks scored with the standard penalty rules, or a seeded
//!   subset for faster builds
//! - **Rendering**: Module matrix, SVG, HTML, PNG, greyscale image and terminal output
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Only the data is required, everything else has a default
//! let qr = QRBuilder::new(b"Hello, World!").build()?;
//!
//! let svg = qr.to_svg(4, 4, "black")?;
//! let png = qr.to_png(4, 4, [0, 0, 0])?;
//! # assert!(svg.starts_with("<?xml"));
//! # assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskSearch, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!".as_bytes())
//!     .ec_level("Q".parse::<ECLevel>()?)   // Defaults to ECLevel::L
//!     .detect_kanji(true)                  // Defaults to false
//!     .mask_search(MaskSearch::Sampled { count: 4, seed: 42 }) // Defaults to MaskSearch::Full
//!     .build()?;
//!
//! let matrix = qr.to_matrix();
//! for row in matrix.rows() {
//!     let line = row.iter().map(|&m| if m == 1 { '#' } else { ' ' }).collect::<String>();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! Pipeline stages are reported through [`tracing`](https://docs.rs/tracing) at `debug` level
//! and per mask penalties at `trace` level. No subscriber is installed by the library.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod render;

pub use builder::{QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::{MaskPattern, MaskSearch};
pub use common::metadata::{ECLevel, Version};
pub use render::Matrix;
