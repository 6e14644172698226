//! Package specifiers: `name`, `@scope/name`, `name@<constraint>`.

use semver::{Version, VersionReq};
use std::fmt;

use crate::error::{MatcherError, Result};

/// Version constraint attached to a specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Any version, including packages that declare none
    Any,
    /// A bare version: matches only that version
    Exact(Version),
    /// A semver range such as `^1.2` or `>=6`
    Range(VersionReq),
}

impl VersionConstraint {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input == "*" {
            return Ok(VersionConstraint::Any);
        }

        if let Ok(version) = Version::parse(input) {
            return Ok(VersionConstraint::Exact(version));
        }

        VersionReq::parse(input)
            .map(VersionConstraint::Range)
            .map_err(|e| MatcherError::invalid(input, format!("invalid version constraint: {e}")))
    }

    /// Check a declared version against this constraint.
    ///
    /// A missing or unparseable version only satisfies [`VersionConstraint::Any`].
    pub fn matches(&self, version: Option<&str>) -> bool {
        match self {
            VersionConstraint::Any => true,
            VersionConstraint::Exact(expected) => version
                .and_then(|v| Version::parse(v.trim()).ok())
                .is_some_and(|v| &v == expected),
            VersionConstraint::Range(req) => version
                .and_then(|v| Version::parse(v.trim()).ok())
                .is_some_and(|v| req.matches(&v)),
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Any => f.write_str("*"),
            VersionConstraint::Exact(version) => write!(f, "{version}"),
            VersionConstraint::Range(req) => write!(f, "{req}"),
        }
    }
}

/// A package name with a version constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpecifier {
    /// Package name, scope included
    pub name: String,
    pub constraint: VersionConstraint,
}

impl PackageSpecifier {
    /// Parse a specifier.
    ///
    /// The version part starts at the last `@` that is not the scope marker.
    ///
    /// ```
    /// use chainpack_matcher::{PackageSpecifier, VersionConstraint};
    ///
    /// let spec = PackageSpecifier::parse("@scope/name@^1.2").unwrap();
    /// assert_eq!(spec.name, "@scope/name");
    /// assert!(matches!(spec.constraint, VersionConstraint::Range(_)));
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (name, constraint) = match input.rfind('@') {
            Some(at) if at > 0 => (&input[..at], VersionConstraint::parse(&input[at + 1..])?),
            _ => (input, VersionConstraint::Any),
        };

        validate_name(input, name)?;

        Ok(Self {
            name: name.to_string(),
            constraint,
        })
    }

    /// Whether a package with this name and version satisfies the specifier.
    ///
    /// Names compare case-sensitively.
    pub fn matches(&self, name: &str, version: Option<&str>) -> bool {
        self.name == name && self.constraint.matches(version)
    }
}

impl fmt::Display for PackageSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.constraint {
            VersionConstraint::Any => f.write_str(&self.name),
            ref constraint => write!(f, "{}@{}", self.name, constraint),
        }
    }
}

fn validate_name(input: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MatcherError::invalid(input, "missing package name"));
    }

    if let Some(scoped) = name.strip_prefix('@') {
        let valid = scoped
            .split_once('/')
            .is_some_and(|(scope, pkg)| !scope.is_empty() && !pkg.is_empty() && !pkg.contains('/'));
        if !valid {
            return Err(MatcherError::invalid(
                input,
                "scoped packages must look like '@scope/name'",
            ));
        }
    } else if name.contains('/') {
        return Err(MatcherError::invalid(input, "unscoped package names cannot contain '/'"));
    }

    if name.chars().any(char::is_whitespace) {
        return Err(MatcherError::invalid(input, "package names cannot contain whitespace"));
    }

    Ok(())
}
