//! Stub templates
//!
//! The defaults are embedded at compile time with [`include_str!`]. Callers
//! may supply their own set, which replaces the defaults wholesale.

use std::fmt;

/// The five templates a stub is rendered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// Binary entry point.
    Root,
    /// Command dispatch.
    Cli,
    /// Package, environment and version constants.
    Meta,
    /// Flag registration and parsing.
    Flags,
    /// Command registration.
    Commands,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Root,
        TemplateKind::Cli,
        TemplateKind::Meta,
        TemplateKind::Flags,
        TemplateKind::Commands,
    ];

    /// Registry name of the template.
    pub fn name(&self) -> &'static str {
        match self {
            TemplateKind::Root => "root",
            TemplateKind::Cli => "cli",
            TemplateKind::Meta => "meta",
            TemplateKind::Flags => "flags",
            TemplateKind::Commands => "commands",
        }
    }

    /// File the template renders to. The root lands in `src/`, the rest in
    /// the inner package directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateKind::Root => "main.rs",
            TemplateKind::Cli => "cli.rs",
            TemplateKind::Meta => "meta.rs",
            TemplateKind::Flags => "flags.rs",
            TemplateKind::Commands => "commands.rs",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const ROOT: &str = include_str!("../templates/main.rs.hbs");
pub const CLI: &str = include_str!("../templates/cli.rs.hbs");
pub const META: &str = include_str!("../templates/meta.rs.hbs");
pub const FLAGS: &str = include_str!("../templates/flags.rs.hbs");
pub const COMMANDS: &str = include_str!("../templates/commands.rs.hbs");

/// Template bodies used to render a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubTemplates {
    pub root: String,
    pub cli: String,
    pub meta: String,
    pub flags: String,
    pub commands: String,
}

impl Default for StubTemplates {
    fn default() -> Self {
        Self {
            root: ROOT.to_string(),
            cli: CLI.to_string(),
            meta: META.to_string(),
            flags: FLAGS.to_string(),
            commands: COMMANDS.to_string(),
        }
    }
}

impl StubTemplates {
    pub fn get(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Root => &self.root,
            TemplateKind::Cli => &self.cli,
            TemplateKind::Meta => &self.meta,
            TemplateKind::Flags => &self.flags,
            TemplateKind::Commands => &self.commands,
        }
    }
}
