// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Permalinks from stored source locations to hosted repositories.
//!
//! Each package slug maps to a [`PermalinkRule`]: the repository URL, a tag
//! template, an optional version remapping, an optional versioned root
//! directory and ordered path routes into sibling repositories. Adding a
//! package is a new table entry, either in [`builtin_rules`] or in the
//! server configuration.
//!
//! # Example
//!
//! ```
//! use cppdoc_permalink::Resolver;
//!
//! let resolver = Resolver::builtin();
//! let url = resolver.resolve("ninja", "1.7.2", "src/build.cc", 42).unwrap();
//! assert_eq!(
//!     url.as_str(),
//!     "https://github.com/ninja-build/ninja/tree/v1.7.2/src/build.cc#L42"
//! );
//! assert!(resolver.resolve("llvm", "4.0.0", "build/generated.h", 1).is_none());
//! ```

mod resolver;
mod rule;

pub use resolver::Resolver;
pub use rule::{PermalinkRule, Route, builtin_rules};
