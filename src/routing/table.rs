//! Route table construction and validation.
//!
//! # Responsibilities
//! - Turn declarative `RouteDecl`s into an immutable arena of `RouteRecord`s
//! - Validate names, paths and root resolution in one depth-first pass
//! - Precompute every record's full pattern so matching never re-parses
//!
//! # Design Decisions
//! - Reports all issues at once, each naming the offending record position
//! - Records are addressed by `RouteId` (pre-order index), never by reference
//! - The table is never mutated after `build` returns

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::navigation::HistoryMode;
use crate::observability::metrics;
use crate::routing::matcher;
use crate::routing::path::{self, PathPattern, PatternError, Segment};

/// Declarative route record, as written in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RouteDecl<V> {
    /// Path pattern. A leading `/` makes it absolute.
    pub path: String,

    /// Optional name, unique across the whole tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Opaque view reference owned by the rendering layer.
    pub component: V,

    /// Nested records, in precedence order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteDecl<V>>,
}

impl<V> RouteDecl<V> {
    pub fn new(path: impl Into<String>, component: V) -> Self {
        Self {
            path: path.into(),
            name: None,
            component,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RouteDecl<V>>) -> Self {
        self.children = children;
        self
    }
}

/// Index of a record inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteId(usize);

impl RouteId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A validated route record owned by a `RouteTable`.
#[derive(Debug)]
pub struct RouteRecord<V> {
    id: RouteId,
    parent: Option<RouteId>,
    depth: usize,
    position: String,
    raw_path: String,
    name: Option<String>,
    pattern: PathPattern,
    full: Vec<Segment>,
    component: V,
    children: Vec<RouteId>,
}

impl<V> RouteRecord<V> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn parent(&self) -> Option<RouteId> {
        self.parent
    }

    /// Zero for root-level records.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Declaration position, e.g. `routes[0].children[2]`.
    pub fn position(&self) -> &str {
        &self.position
    }

    /// The path exactly as declared.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Segments from the root down to and including this record.
    pub fn full_pattern(&self) -> &[Segment] {
        &self.full
    }

    /// Canonical full path, e.g. `/animals` or `/users/:id`.
    pub fn full_path(&self) -> String {
        path::join(&self.full)
    }

    pub fn component(&self) -> &V {
        &self.component
    }

    pub fn children(&self) -> &[RouteId] {
        &self.children
    }
}

/// Options fixed at table build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// How navigation reconciles the visible URL.
    pub mode: HistoryMode,

    /// Require that `/` resolves to some chain.
    pub require_root: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            mode: HistoryMode::History,
            require_root: true,
        }
    }
}

/// A single problem found while building a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigIssue {
    #[error("duplicate route name '{name}' at {second} (first declared at {first})")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("root-level route {position} has relative path '{path}'; root routes must start with '/'")]
    RelativeRootPath { position: String, path: String },

    #[error("absolute route {position} ('{path}') does not extend its parent path '{parent_path}'")]
    UnreachableAbsolute {
        position: String,
        path: String,
        parent_path: String,
    },

    #[error("route {position} has invalid path '{path}': {reason}")]
    InvalidPath {
        position: String,
        path: String,
        reason: PatternError,
    },

    #[error("no route resolves the root location '/'")]
    MissingRootRoute,
}

/// Fatal route configuration error, listing every issue found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid route table: {}", join_issues(.issues))]
pub struct ConfigError {
    pub issues: Vec<ConfigIssue>,
}

fn join_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Immutable route tree.
#[derive(Debug)]
pub struct RouteTable<V> {
    records: Vec<RouteRecord<V>>,
    roots: Vec<RouteId>,
    names: HashMap<String, RouteId>,
    mode: HistoryMode,
}

impl<V> RouteTable<V> {
    /// Build and validate a table from declarations.
    pub fn build(decls: Vec<RouteDecl<V>>, options: BuildOptions) -> Result<Self, ConfigError> {
        let mut builder = Builder {
            records: Vec::new(),
            names: HashMap::new(),
            issues: Vec::new(),
        };

        let roots = decls
            .into_iter()
            .enumerate()
            .map(|(i, decl)| builder.insert(decl, None, format!("routes[{}]", i)))
            .collect();

        let Builder {
            records,
            names,
            mut issues,
        } = builder;

        let table = Self {
            records,
            roots,
            names,
            mode: options.mode,
        };

        if issues.is_empty() && options.require_root && !matcher::match_location(&table, "/").is_match() {
            issues.push(ConfigIssue::MissingRootRoute);
        }

        if !issues.is_empty() {
            metrics::record_table_build(false);
            tracing::error!(issues = issues.len(), "Route table rejected");
            return Err(ConfigError { issues });
        }

        metrics::record_table_build(true);
        tracing::debug!(
            routes = table.records.len(),
            roots = table.roots.len(),
            named = table.names.len(),
            mode = ?table.mode,
            "Route table built"
        );
        Ok(table)
    }

    pub fn get(&self, id: RouteId) -> Option<&RouteRecord<V>> {
        self.records.get(id.0)
    }

    /// Look up a record by id.
    ///
    /// Ids only come from this table, so the index is always in range.
    pub(crate) fn record(&self, id: RouteId) -> &RouteRecord<V> {
        &self.records[id.0]
    }

    /// All records in pre-order.
    pub fn records(&self) -> &[RouteRecord<V>] {
        &self.records
    }

    pub fn roots(&self) -> &[RouteId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn mode(&self) -> HistoryMode {
        self.mode
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteRecord<V>> {
        self.names.get(name).map(|id| self.record(*id))
    }

    /// Full path of a named route, for navigating by name.
    ///
    /// Returns `None` for unknown names and for routes with parameter segments.
    pub fn path_for_name(&self, name: &str) -> Option<String> {
        let record = self.by_name(name)?;
        if record.full.iter().any(Segment::is_param) {
            return None;
        }
        Some(record.full_path())
    }
}

struct Builder<V> {
    records: Vec<RouteRecord<V>>,
    names: HashMap<String, RouteId>,
    issues: Vec<ConfigIssue>,
}

impl<V> Builder<V> {
    fn insert(&mut self, decl: RouteDecl<V>, parent: Option<RouteId>, position: String) -> RouteId {
        let id = RouteId(self.records.len());
        let (depth, parent_full) = match parent {
            Some(p) => {
                let parent = &self.records[p.0];
                (parent.depth + 1, parent.full.clone())
            }
            None => (0, Vec::new()),
        };

        let (pattern, parsed) = match PathPattern::parse(&decl.path) {
            Ok(pattern) => (pattern, true),
            Err(reason) => {
                self.issues.push(ConfigIssue::InvalidPath {
                    position: position.clone(),
                    path: decl.path.clone(),
                    reason,
                });
                (PathPattern::Relative(Vec::new()), false)
            }
        };

        let full = match &pattern {
            PathPattern::Relative(segments) => {
                if parent.is_none() && parsed {
                    self.issues.push(ConfigIssue::RelativeRootPath {
                        position: position.clone(),
                        path: decl.path.clone(),
                    });
                }
                let mut full = parent_full;
                full.extend(segments.iter().cloned());
                full
            }
            PathPattern::Absolute(segments) => {
                if !segments.starts_with(&parent_full) {
                    self.issues.push(ConfigIssue::UnreachableAbsolute {
                        position: position.clone(),
                        path: decl.path.clone(),
                        parent_path: path::join(&parent_full),
                    });
                }
                segments.clone()
            }
        };

        if let Some(name) = &decl.name {
            if let Some(first) = self.names.get(name) {
                self.issues.push(ConfigIssue::DuplicateName {
                    name: name.clone(),
                    first: self.records[first.0].position.clone(),
                    second: position.clone(),
                });
            } else {
                self.names.insert(name.clone(), id);
            }
        }

        self.records.push(RouteRecord {
            id,
            parent,
            depth,
            position: position.clone(),
            raw_path: decl.path,
            name: decl.name,
            pattern,
            full,
            component: decl.component,
            children: Vec::new(),
        });

        let children: Vec<RouteId> = decl
            .children
            .into_iter()
            .enumerate()
            .map(|(i, child)| self.insert(child, Some(id), format!("{}.children[{}]", position, i)))
            .collect();
        self.records[id.0].children = children;

        id
    }
}

impl<V: fmt::Display> fmt::Display for RouteTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            write!(
                f,
                "{:indent$}{} -> {}",
                "",
                record.full_path(),
                record.component,
                indent = record.depth * 2
            )?;
            if let Some(name) = &record.name {
                write!(f, " ({})", name)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observed() -> Vec<RouteDecl<&'static str>> {
        vec![RouteDecl::new("/", "Main").with_children(vec![
            RouteDecl::new("", "Diagnosis").named("home"),
            RouteDecl::new("/animals", "Diagnosis"),
            RouteDecl::new("/extremum", "Diagnosis"),
        ])]
    }

    #[test]
    fn test_build_observed_config() {
        let table = RouteTable::build(observed(), BuildOptions::default()).unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.roots().len(), 1);

        let root = table.get(table.roots()[0]).unwrap();
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.depth(), 0);

        let animals = table.get(root.children()[1]).unwrap();
        assert!(animals.pattern().is_absolute());
        assert_eq!(animals.full_path(), "/animals");
        assert_eq!(animals.parent(), Some(root.id()));
        assert_eq!(animals.position(), "routes[0].children[1]");
    }

    #[test]
    fn test_relative_children_extend_parent() {
        let decls = vec![RouteDecl::new("/", "Root").with_children(vec![
            RouteDecl::new("/users", "Users").with_children(vec![RouteDecl::new(":id/posts", "Posts")]),
        ])];
        let table = RouteTable::build(decls, BuildOptions::default()).unwrap();
        let posts = table.records().last().unwrap();

        assert_eq!(posts.full_path(), "/users/:id/posts");
        assert_eq!(posts.depth(), 2);
        assert_eq!(table.get(posts.parent().unwrap()).unwrap().full_path(), "/users");
    }

    #[test]
    fn test_duplicate_names_rejected_at_any_depth() {
        let decls = vec![RouteDecl::new("/", "Root")
            .named("dup")
            .with_children(vec![RouteDecl::new("a", "A").with_children(vec![RouteDecl::new("b", "B").named("dup")])])];

        let err = RouteTable::build(decls, BuildOptions::default()).unwrap_err();
        assert_eq!(
            err.issues,
            vec![ConfigIssue::DuplicateName {
                name: "dup".into(),
                first: "routes[0]".into(),
                second: "routes[0].children[0].children[0]".into(),
            }]
        );
    }

    #[test]
    fn test_all_issues_reported_together() {
        let decls = vec![
            RouteDecl::new("relative", "X").named("x"),
            RouteDecl::new("/", "Root").with_children(vec![
                RouteDecl::new("/:", "Bad"),
                RouteDecl::new("", "Home").named("x"),
            ]),
        ];

        let err = RouteTable::build(decls, BuildOptions::default()).unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(matches!(err.issues[0], ConfigIssue::RelativeRootPath { .. }));
        assert!(matches!(
            err.issues[1],
            ConfigIssue::InvalidPath { reason: PatternError::EmptyParam, .. }
        ));
        assert!(matches!(err.issues[2], ConfigIssue::DuplicateName { .. }));
    }

    #[test]
    fn test_unparsable_root_path_reports_one_issue() {
        let decls = vec![RouteDecl::new("/:", "Bad"), RouteDecl::new("/", "Root")];

        let err = RouteTable::build(decls, BuildOptions::default()).unwrap_err();
        assert_eq!(
            err.issues,
            vec![ConfigIssue::InvalidPath {
                position: "routes[0]".into(),
                path: "/:".into(),
                reason: PatternError::EmptyParam,
            }]
        );
    }

    #[test]
    fn test_unreachable_absolute_child() {
        let decls = vec![
            RouteDecl::new("/", "Root"),
            RouteDecl::new("/foo", "Foo").with_children(vec![RouteDecl::new("/bar", "Bar")]),
        ];

        let err = RouteTable::build(decls, BuildOptions::default()).unwrap_err();
        assert_eq!(
            err.issues,
            vec![ConfigIssue::UnreachableAbsolute {
                position: "routes[1].children[0]".into(),
                path: "/bar".into(),
                parent_path: "/foo".into(),
            }]
        );
    }

    #[test]
    fn test_missing_root_route() {
        let decls = vec![RouteDecl::new("/animals", "Animals")];

        let err = RouteTable::build(decls.clone(), BuildOptions::default()).unwrap_err();
        assert_eq!(err.issues, vec![ConfigIssue::MissingRootRoute]);
        assert!(err.to_string().contains("no route resolves"));

        let options = BuildOptions {
            require_root: false,
            ..BuildOptions::default()
        };
        assert!(RouteTable::build(decls, options).is_ok());
    }

    #[test]
    fn test_empty_table_requires_root() {
        let err = RouteTable::<&str>::build(Vec::new(), BuildOptions::default()).unwrap_err();
        assert_eq!(err.issues, vec![ConfigIssue::MissingRootRoute]);
    }

    #[test]
    fn test_path_for_name() {
        let mut decls = observed();
        decls[0].children.push(RouteDecl::new("/users/:id", "User").named("user"));
        decls[0].children[1].name = Some("animals".into());
        let table = RouteTable::build(decls, BuildOptions::default()).unwrap();

        assert_eq!(table.path_for_name("home").as_deref(), Some("/"));
        assert_eq!(table.path_for_name("animals").as_deref(), Some("/animals"));
        assert_eq!(table.path_for_name("user"), None);
        assert_eq!(table.path_for_name("missing"), None);
    }

    #[test]
    fn test_display_renders_tree() {
        let table = RouteTable::build(observed(), BuildOptions::default()).unwrap();
        let rendered = table.to_string();

        assert!(rendered.starts_with("/ -> Main\n"));
        assert!(rendered.contains("  / -> Diagnosis (home)\n"));
        assert!(rendered.contains("  /animals -> Diagnosis\n"));
    }

    #[test]
    fn test_decl_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            routes: Vec<RouteDecl<String>>,
        }

        let doc: Doc = toml::from_str(
            r#"
            [[routes]]
            path = "/"
            component = "Main"

            [[routes.children]]
            path = ""
            name = "home"
            component = "Diagnosis"
            "#,
        )
        .unwrap();

        assert_eq!(doc.routes[0].children[0].name.as_deref(), Some("home"));
        assert!(doc.routes[0].children[0].children.is_empty());
    }
}
