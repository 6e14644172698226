//! Rule sets built from a project's transform policy.

use chainpack_config::{NodeModulesTransform, TransformKind};
use rustc_hash::FxHashMap;

use crate::error::{MatcherError, Result};
use crate::specifier::{PackageSpecifier, VersionConstraint};
use crate::tables::{DEFAULT_BLANKET_EXCLUDES, SYNTAX_INCOMPATIBLE_PACKAGES};

/// Package name -> version constraints, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageTable {
    entries: FxHashMap<String, Vec<VersionConstraint>>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from specifier strings
    pub fn from_specifiers<I, S>(specifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for specifier in specifiers {
            table.insert(PackageSpecifier::parse(specifier.as_ref())?);
        }
        Ok(table)
    }

    pub fn insert(&mut self, specifier: PackageSpecifier) {
        let constraints = self.entries.entry(specifier.name).or_default();
        if !constraints.contains(&specifier.constraint) {
            constraints.push(specifier.constraint);
        }
    }

    /// Drop every entry for `name`; returns whether anything was removed
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether any entry for `name` accepts `version`
    pub fn matches(&self, name: &str, version: Option<&str>) -> bool {
        self.entries
            .get(name)
            .is_some_and(|constraints| constraints.iter().any(|c| c.matches(version)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The active dependency-transpilation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageMatchRuleSet {
    /// Transpile every dependency except `exclude`
    Blanket { exclude: PackageTable },
    /// Transpile only dependencies listed in `include`
    Selective { include: PackageTable },
}

impl PackageMatchRuleSet {
    /// Build the rule set for a project's transform policy.
    ///
    /// Blanket rule sets start from [`DEFAULT_BLANKET_EXCLUDES`]; packages the
    /// user explicitly includes are removed from it. Selective rule sets start
    /// from [`SYNTAX_INCOMPATIBLE_PACKAGES`]; packages the user explicitly
    /// excludes are removed from it.
    ///
    /// # Errors
    ///
    /// [`MatcherError::InvalidRuleSet`] for malformed specifiers, or when the
    /// same package is both included and excluded.
    pub fn from_policy(policy: &NodeModulesTransform) -> Result<Self> {
        let include = parse_all(&policy.include)?;
        let exclude = parse_all(&policy.exclude)?;

        if let Some(conflict) = include
            .iter()
            .find(|inc| exclude.iter().any(|exc| exc.name == inc.name))
        {
            return Err(MatcherError::invalid(
                conflict.to_string(),
                "package is listed in both include and exclude",
            ));
        }

        let rule_set = match policy.kind {
            TransformKind::All => {
                let mut table = PackageTable::from_specifiers(DEFAULT_BLANKET_EXCLUDES)?;
                for spec in &include {
                    table.remove(&spec.name);
                }
                for spec in exclude {
                    table.insert(spec);
                }
                PackageMatchRuleSet::Blanket { exclude: table }
            }
            TransformKind::None => {
                let mut table = PackageTable::from_specifiers(SYNTAX_INCOMPATIBLE_PACKAGES)?;
                for spec in &exclude {
                    table.remove(&spec.name);
                }
                for spec in include {
                    table.insert(spec);
                }
                PackageMatchRuleSet::Selective { include: table }
            }
        };

        tracing::debug!(
            kind = rule_set.kind(),
            entries = rule_set.table().len(),
            "built package rule set"
        );
        Ok(rule_set)
    }

    /// Selective rule set holding a single specifier
    pub fn selective_for(specifier: &str) -> Result<Self> {
        Ok(PackageMatchRuleSet::Selective {
            include: PackageTable::from_specifiers([specifier])?,
        })
    }

    /// Whether a package with this identity is transpiled
    pub fn accepts(&self, name: &str, version: Option<&str>) -> bool {
        match self {
            PackageMatchRuleSet::Blanket { exclude } => !exclude.matches(name, version),
            PackageMatchRuleSet::Selective { include } => include.matches(name, version),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PackageMatchRuleSet::Blanket { .. } => "blanket",
            PackageMatchRuleSet::Selective { .. } => "selective",
        }
    }

    pub fn table(&self) -> &PackageTable {
        match self {
            PackageMatchRuleSet::Blanket { exclude } => exclude,
            PackageMatchRuleSet::Selective { include } => include,
        }
    }
}

fn parse_all(specifiers: &[String]) -> Result<Vec<PackageSpecifier>> {
    specifiers
        .iter()
        .map(|s| PackageSpecifier::parse(s))
        .collect()
}
