// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::Url;

use crate::rule::{PermalinkRule, builtin_rules};

/// Characters escaped inside a single URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Slug-indexed permalink rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolver {
    rules: BTreeMap<String, PermalinkRule>,
}

impl Resolver {
    pub fn new(rules: BTreeMap<String, PermalinkRule>) -> Self {
        Self { rules }
    }

    /// The built-in package table.
    pub fn builtin() -> Self {
        Self::new(builtin_rules())
    }

    /// Add rules, replacing built-in rules of the same slug.
    #[must_use]
    pub fn with_overrides(
        mut self,
        overrides: impl IntoIterator<Item = (String, PermalinkRule)>,
    ) -> Self {
        self.rules.extend(overrides);
        self
    }

    pub fn rule(&self, slug: &str) -> Option<&PermalinkRule> {
        self.rules.get(slug)
    }

    /// Permalink of `line` in the stored `path` of package `slug` at `version`.
    ///
    /// Returns `None` when the package, version or path has no mapping.
    pub fn resolve(&self, slug: &str, version: &str, path: &str, line: u32) -> Option<Url> {
        // URL parsers read `\` as a separator, so it never reaches a segment.
        if path.starts_with('/') || path.contains('\\') || path.split('/').any(|s| s == "..") {
            return None;
        }

        let rule = self.rules.get(slug)?;
        let tag = rule.tag_for(version)?;
        if is_dot_segment(&tag) {
            return None;
        }
        let (repository, path) = rule.locate(version, path)?;

        let path = path
            .split('/')
            .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        let link = format!(
            "{}/tree/{}/{path}#L{line}",
            repository.trim_end_matches('/'),
            utf8_percent_encode(&tag, SEGMENT),
        );

        match Url::parse(&link) {
            Ok(url) => Some(url),
            Err(e) => {
                log::debug!("no permalink for {slug} {version} {path}: {e}");
                None
            }
        }
    }
}

fn is_dot_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_segments_are_escaped() {
        let url = Resolver::builtin()
            .resolve("opencv", "3.3.0", "modules/core/a b#c.hpp", 3)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.com/opencv/opencv/tree/3.3.0/modules/core/a%20b%23c.hpp#L3"
        );
    }

    #[test]
    fn test_paths_leaving_the_checkout() {
        let resolver = Resolver::builtin();
        assert!(resolver.resolve("ninja", "1.7.2", "/usr/include/stdio.h", 1).is_none());
        assert!(resolver.resolve("ninja", "1.7.2", "src/../../etc", 1).is_none());
        assert!(resolver.resolve("ninja", "1.7.2", "src\\..\\..\\evil\\x.cc", 1).is_none());
        assert!(resolver.resolve("opencv", "..", "modules/core/a.hpp", 1).is_none());
    }

    #[test]
    fn test_relative_repository_is_unmapped() {
        let resolver = Resolver::default().with_overrides([(
            "local".to_owned(),
            PermalinkRule::new("not a url", "{version}"),
        )]);
        assert!(resolver.resolve("local", "1.0", "a.c", 1).is_none());
    }

    #[test]
    fn test_override_replaces_builtin() {
        let resolver = Resolver::builtin().with_overrides([(
            "ninja".to_owned(),
            PermalinkRule::new("https://git.example.org/ninja", "release-{version}"),
        )]);
        let url = resolver.resolve("ninja", "1.8.2", "src/graph.cc", 7).unwrap();
        assert_eq!(
            url.as_str(),
            "https://git.example.org/ninja/tree/release-1.8.2/src/graph.cc#L7"
        );
        assert!(resolver.rule("mosh").is_some());
    }

    proptest! {
        #[test]
        fn resolve_is_deterministic(
            slug in prop::sample::select(vec!["ninja", "fish", "llvm", "libsequence", "unknown"]),
            version in "[0-9]\\.[0-9]\\.[0-9]",
            path in "[a-z_./ -]{0,40}",
            line in 1u32..100_000,
        ) {
            let resolver = Resolver::builtin();
            let first = resolver.resolve(slug, &version, &path, line);
            prop_assert_eq!(&first, &resolver.resolve(slug, &version, &path, line));
            if let Some(url) = first {
                prop_assert_eq!(url.scheme(), "https");
                let suffix = format!("#L{line}");
                prop_assert!(url.as_str().ends_with(&suffix));
            }
        }
    }
}
