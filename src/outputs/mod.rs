//! Output generation modules for the rendered dashboard pages.
//!
//! Each render cycle writes, per board, one HTML page and one JSON
//! snapshot, plus a single index page linking every board:
//!
//! ```text
//! output_dir/
//! ├── index.html
//! ├── telecom.html
//! ├── telecom.json
//! ├── delivery.html
//! └── delivery.json
//! ```
//!
//! Pages are self-contained (inline stylesheet, no assets) and embed a
//! `meta refresh` tag when the tool runs with an interval, so a browser tab
//! pointed at the output directory tracks the render cycles on its own.

pub mod html;
pub mod json;
