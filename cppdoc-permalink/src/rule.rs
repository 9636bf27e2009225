// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::Deserialize;

const VERSION_PLACEHOLDER: &str = "{version}";

fn default_tag() -> String {
    VERSION_PLACEHOLDER.into()
}

/// How locations of one package map onto its hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermalinkRule {
    /// Repository URL without a trailing slash, e.g. `https://github.com/ninja-build/ninja`.
    pub repository: String,

    /// Tag template; `{version}` is replaced by the package version.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Explicit version to tag mapping. When non-empty, versions missing
    /// from it have no permalink.
    #[serde(default)]
    pub versions: BTreeMap<String, String>,

    /// Directory template the stored paths are relative to.
    #[serde(default)]
    pub root: Option<String>,

    /// Path prefixes routed to other repositories, first match wins.
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A path prefix handled by another repository, or by none.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    pub prefix: String,

    /// Number of leading characters removed from a matching path.
    #[serde(default)]
    pub strip: usize,

    /// Target repository; `None` leaves matching paths unmapped.
    #[serde(default)]
    pub repository: Option<String>,
}

impl PermalinkRule {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
            versions: BTreeMap::new(),
            root: None,
            routes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>, tag: impl Into<String>) -> Self {
        self.versions.insert(version.into(), tag.into());
        self
    }

    #[must_use]
    pub fn with_route(mut self, prefix: &str, strip: usize, repository: Option<String>) -> Self {
        self.routes.push(Route {
            prefix: prefix.into(),
            strip,
            repository,
        });
        self
    }

    /// Tag of `version`, or `None` when the version is not mapped.
    pub fn tag_for(&self, version: &str) -> Option<String> {
        if self.versions.is_empty() {
            Some(self.tag.replace(VERSION_PLACEHOLDER, version))
        } else {
            self.versions.get(version).cloned()
        }
    }

    /// Repository and repository-relative path of a stored file path.
    pub fn locate<'a>(&'a self, version: &str, path: &'a str) -> Option<(&'a str, String)> {
        let path = match &self.root {
            Some(root) => relative_to(path, &root.replace(VERSION_PLACEHOLDER, version))?,
            None => path,
        };

        match self.routes.iter().find(|r| path.starts_with(&r.prefix)) {
            Some(route) => {
                let repository = route.repository.as_deref()?;
                Some((repository, path.chars().skip(route.strip).collect()))
            }
            None => Some((self.repository.as_str(), path.to_owned())),
        }
    }
}

/// `path` with the directory `root` removed, or `None` outside of it.
fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    let rest = path
        .strip_prefix("./")
        .unwrap_or(path)
        .strip_prefix(root.trim_end_matches('/'))?
        .strip_prefix('/')?;
    (!rest.is_empty()).then_some(rest)
}

fn github(repository: &str) -> String {
    format!("https://github.com/{repository}")
}

/// The package slugs known without configuration.
pub fn builtin_rules() -> BTreeMap<String, PermalinkRule> {
    let llvm = PermalinkRule::new(github("llvm-mirror/llvm"), "")
        .with_version("4.0.0", "release_40")
        .with_version("5.0.0", "release_50")
        .with_route(
            "tools/clang/tools/extra",
            24,
            Some(github("llvm-mirror/clang-tools-extra")),
        )
        .with_route("tools/clang", 12, Some(github("llvm-mirror/clang")))
        .with_route("tools/lldb", 11, Some(github("llvm-mirror/lldb")))
        .with_route("tools/lld", 10, Some(github("llvm-mirror/lld")))
        .with_route(
            "projects/compiler-rt",
            21,
            Some(github("llvm-mirror/compiler-rt")),
        )
        .with_route("build", 0, None);

    [
        ("ninja", PermalinkRule::new(github("ninja-build/ninja"), "v{version}")),
        ("mosh", PermalinkRule::new(github("mobile-shell/mosh"), "mosh-{version}")),
        (
            "fish",
            PermalinkRule::new(github("fish-shell/fish-shell"), "{version}")
                .with_root("fish-shell-{version}"),
        ),
        ("opencv", PermalinkRule::new(github("opencv/opencv"), "{version}")),
        ("protobuf", PermalinkRule::new(github("google/protobuf"), "v{version}")),
        ("bitcoin", PermalinkRule::new(github("bitcoin/bitcoin"), "v{version}")),
        (
            "libsequence",
            PermalinkRule::new(github("molpopgen/libsequence"), "{version}")
                .with_root("libsequence-{version}"),
        ),
        ("llvm", llvm),
    ]
    .into_iter()
    .map(|(slug, rule)| (slug.to_owned(), rule))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("fish-2/src/a.cpp", "fish-2"), Some("src/a.cpp"));
        assert_eq!(relative_to("./fish-2/a.cpp", "fish-2/"), Some("a.cpp"));
        assert_eq!(relative_to("fish-2", "fish-2"), None);
        assert_eq!(relative_to("fish-20/a.cpp", "fish-2"), None);
        assert_eq!(relative_to("src/a.cpp", "fish-2"), None);
    }

    #[test]
    fn test_version_map_replaces_template() {
        let rule = PermalinkRule::new("https://example.org/r", "v{version}");
        assert_eq!(rule.tag_for("1.0").as_deref(), Some("v1.0"));

        let rule = rule.with_version("1.0", "stable");
        assert_eq!(rule.tag_for("1.0").as_deref(), Some("stable"));
        assert_eq!(rule.tag_for("2.0"), None);
    }

    #[test]
    fn test_lldb_is_not_routed_to_lld() {
        let rules = builtin_rules();
        let (repository, path) = rules["llvm"]
            .locate("4.0.0", "tools/lldb/source/API/SBTarget.cpp")
            .unwrap();
        assert_eq!(repository, "https://github.com/llvm-mirror/lldb");
        assert_eq!(path, "source/API/SBTarget.cpp");
    }

    #[test]
    fn test_rule_from_toml() {
        let rule: PermalinkRule = toml::from_str(
            r#"
            repository = "https://gitlab.com/example/lib"
            root = "lib-{version}"

            [[routes]]
            prefix = "third_party"
            "#,
        )
        .unwrap();
        assert_eq!(rule.tag, "{version}");
        assert_eq!(rule.root.as_deref(), Some("lib-{version}"));
        assert_eq!(rule.routes[0].repository, None);
        assert_eq!(rule.locate("1.2", "lib-1.2/third_party/x.h"), None);

        let unknown = toml::from_str::<PermalinkRule>("repository = \"x\"\nbranch = \"main\"");
        assert!(unknown.is_err());
    }
}
