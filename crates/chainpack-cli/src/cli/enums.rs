use chainpack_synth::{BuildVariant, Environment};
use clap::ValueEnum;

/// Build environment
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum BuildEnv {
    /// Unminified build with source maps, optionally hot-reloaded
    #[value(name = "development")]
    Development,

    /// Minified, hashed build
    #[value(name = "production")]
    Production,
}

impl From<BuildEnv> for Environment {
    fn from(env: BuildEnv) -> Self {
        match env {
            BuildEnv::Development => Environment::Development,
            BuildEnv::Production => Environment::Production,
        }
    }
}

/// Build variant
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum Variant {
    /// Client-side rendering (browser target)
    #[value(name = "csr")]
    Csr,

    /// Server-side rendering (node target, commonjs2 output)
    #[value(name = "ssr")]
    Ssr,
}

impl From<Variant> for BuildVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Csr => BuildVariant::Csr,
            Variant::Ssr => BuildVariant::Ssr,
        }
    }
}
