//! Built-in package tables merged into every rule set.

/// Packages never transpiled under the blanket policy.
///
/// These ship pre-compiled ES5 and are large enough that running them
/// through the transpiler noticeably slows builds.
pub const DEFAULT_BLANKET_EXCLUDES: &[&str] = &[
    "@babel/runtime",
    "antd",
    "core-js",
    "echarts",
    "lodash",
    "moment",
    "react",
    "react-dom",
    "react-router",
    "react-router-dom",
    "regenerator-runtime",
    "zrender",
];

/// Packages whose published builds use syntax older runtimes cannot parse.
///
/// Always transpiled under the selective policy.
pub const SYNTAX_INCOMPATIBLE_PACKAGES: &[&str] = &[
    "@umijs/hooks@>=1",
    "ansi-regex@>=4",
    "ansi-styles@>=4",
    "decode-uri-component@>=0.2.1",
    "filter-obj@>=2",
    "is-plain-obj@>=2",
    "query-string@>=6",
    "react-intl@>=3",
    "split-on-first@*",
    "strict-uri-encode@>=2",
    "strip-ansi@>=6",
];
