//! Stubpack CLI - packs assets into self-contained executable stubs
//!
//! Usage: stubpack <COMMAND>
//!
//! Commands:
//!   pack          Pack an asset into a stub and store it in a backend
//!   unpack        Run a stub to materialize its asset
//!   stub-version  Print the asset version a stub carries

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use stubpack::config::{BackendSettings, ConfigResolver, Environment, PackSettings};
use stubpack::domain::entities::{StubSource, UnpackRequest};
use stubpack::{logging, CargoBuildTool, DefaultBackendFactory, PackUseCase, UnpackUseCase};

/// Stubpack - pack assets into self-contained executable stubs
#[derive(Parser, Debug)]
#[command(name = "stubpack")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack an asset into a stub and store it in a backend
    Pack(PackArgs),

    /// Run a stub to materialize its asset
    Unpack(UnpackArgs),

    /// Print the asset version a stub carries
    StubVersion {
        /// Path to the stub
        stub: PathBuf,
    },
}

#[derive(Args, Debug)]
struct PackArgs {
    /// Config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Asset name, also the stub binary name
    #[arg(short, long)]
    name: Option<String>,

    /// Asset version
    #[arg(long)]
    asset_version: Option<String>,

    /// File or directory to pack
    #[arg(short, long)]
    asset_path: Option<PathBuf>,

    /// Directory receiving the stub
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Environment baked into the stub
    #[arg(short, long)]
    environment: Option<String>,

    /// Regular expression of asset paths to leave out (repeatable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Object metadata as KEY=VALUE (repeatable)
    #[arg(short, long, value_parser = parse_key_value)]
    metadata: Vec<(String, String)>,

    /// Remove the workspace when the run ends
    #[arg(long, conflicts_with = "keep_workspace")]
    clean_cache: bool,

    /// Leave the workspace on disk
    #[arg(long)]
    keep_workspace: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Args, Debug)]
struct BackendArgs {
    /// Backend: fs, gcp, aws or azure
    #[arg(long)]
    cloud: Option<String>,

    /// Bucket, or directory for the fs backend
    #[arg(long)]
    bucket: Option<String>,

    /// Folder objects are placed under
    #[arg(long)]
    folder: Option<String>,

    /// Object name (defaults to <name>_<version>)
    #[arg(long)]
    object_name: Option<String>,

    /// Credentials file
    #[arg(long)]
    credentials_path: Option<PathBuf>,

    /// Credential mode: default or file
    #[arg(long)]
    credentials_mode: Option<String>,

    /// Region (aws)
    #[arg(long)]
    region: Option<String>,

    /// Upload even if the object already exists
    #[arg(long)]
    skip_remote_check: bool,
}

#[derive(Args, Debug)]
struct UnpackArgs {
    /// Local stub to run
    #[arg(short, long, conflicts_with = "object")]
    stub: Option<PathBuf>,

    /// Backend object key of the stub to fetch
    #[arg(long)]
    object: Option<String>,

    /// Directory the fetched stub is written to
    #[arg(long, default_value = ".")]
    staging_dir: PathBuf,

    /// Directory to materialize the asset into
    #[arg(short, long, default_value = ".")]
    target: PathBuf,

    /// Materialize under <target>/<name>
    #[arg(short, long)]
    name: Option<String>,

    /// Delete the stub afterwards
    #[arg(long)]
    clean: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Pack(args) => cmd_pack(args),
        Commands::Unpack(args) => cmd_unpack(args),
        Commands::StubVersion { stub } => cmd_stub_version(stub),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn cmd_pack(args: PackArgs) -> Result<ExitCode> {
    let env = Environment::capture();
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let resolver = ConfigResolver::new(env.clone(), cwd);

    let config = args.config.clone();
    let resolved = resolver.resolve(args.into_settings(), config.as_deref())?;

    let build_tool = CargoBuildTool::from_env_value(env.get("CARGO"));
    if !build_tool.check_available() {
        bail!("cargo is required to build stubs but could not be started");
    }

    let outcome = PackUseCase::new(build_tool, DefaultBackendFactory).execute(&resolved.request);
    if outcome.cleanup.requires_attention() {
        eprintln!("Warning: {}", outcome.cleanup.describe());
    }
    if let (true, Some(artifact), Some(location)) =
        (outcome.is_success(), &outcome.artifact, &outcome.location)
    {
        println!("Packed {} {} -> {}", artifact.name, artifact.version, location);
    }

    let requires_attention = outcome.requires_attention();
    if let Some(err) = outcome.error {
        return Err(err.into());
    }
    Ok(if requires_attention {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn cmd_unpack(args: UnpackArgs) -> Result<ExitCode> {
    let source = match (args.stub, args.object) {
        (Some(stub), _) => StubSource::Local(stub),
        (None, Some(object)) => {
            let cwd = std::env::current_dir().context("failed to read the working directory")?;
            let resolver = ConfigResolver::new(Environment::capture(), cwd);
            StubSource::Backend {
                config: resolver.backend_config(args.backend.into_settings())?,
                object,
                staging_dir: args.staging_dir,
            }
        }
        (None, None) => bail!("either --stub or --object is required"),
    };

    let request = UnpackRequest {
        target: args.target,
        source,
        name: args.name,
        clean_stub: args.clean,
    };
    let report = UnpackUseCase::new(DefaultBackendFactory).execute(&request)?;

    println!("Unpacked {} into {}", report.stub.display(), report.target.display());
    Ok(ExitCode::SUCCESS)
}

fn cmd_stub_version(stub: PathBuf) -> Result<ExitCode> {
    let version = UnpackUseCase::new(DefaultBackendFactory).stub_version(&stub)?;
    println!("{}", version);
    Ok(ExitCode::SUCCESS)
}

impl PackArgs {
    /// The explicit layer; flags that were not given stay unset.
    fn into_settings(self) -> PackSettings {
        let clean_cache = if self.keep_workspace {
            Some(false)
        } else if self.clean_cache {
            Some(true)
        } else {
            None
        };
        PackSettings {
            name: self.name,
            version: self.asset_version,
            asset_path: self.asset_path,
            output_path: self.output,
            environment: self.environment,
            ignore: self.ignore,
            metadata: self.metadata.into_iter().collect::<BTreeMap<_, _>>(),
            backend: self.backend.into_settings(),
            clean_cache,
            config_path: None,
        }
    }
}

impl BackendArgs {
    fn into_settings(self) -> BackendSettings {
        BackendSettings {
            cloud: self.cloud,
            bucket: self.bucket,
            folder: self.folder,
            object_name: self.object_name,
            credentials_path: self.credentials_path,
            credentials_mode: self.credentials_mode,
            region: self.region,
            skip_remote_check: self.skip_remote_check.then_some(true),
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_pairs_parse() {
        assert_eq!(
            parse_key_value("owner=platform").unwrap(),
            ("owner".to_string(), "platform".to_string())
        );
        assert_eq!(
            parse_key_value("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn unset_flags_leave_layers_alone() {
        let cli = Cli::parse_from(["stubpack", "pack"]);
        let Commands::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        assert_eq!(args.into_settings(), PackSettings::default());
    }

    #[test]
    fn keep_workspace_is_an_explicit_false() {
        let cli = Cli::parse_from(["stubpack", "pack", "--keep-workspace", "-n", "demo"]);
        let Commands::Pack(args) = cli.command else {
            panic!("expected pack");
        };
        let settings = args.into_settings();
        assert_eq!(settings.clean_cache, Some(false));
        assert_eq!(settings.name.as_deref(), Some("demo"));
    }
}
