use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "prims",
    about = "Cryptographic primitives: hashing, Merkle proofs, signatures, secure randomness",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file; its `[dispatch]` limits apply to every command
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Call any operation with a JSON argument object
    Call(CallArgs),
    /// List available operations
    Ops,
    /// Hash a string
    Hash(HashArgs),
    /// Generate a key pair
    Keygen(KeygenArgs),
    /// Print a random version-4 UUID
    Uuid,
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct CallArgs {
    /// Operation name, e.g. `merkle_root`
    pub operation: String,
    /// Argument object as JSON
    #[arg(long, default_value = "{}")]
    pub args: String,
}

#[derive(Args)]
pub struct HashArgs {
    pub data: String,
    #[arg(short, long, default_value = "SHA-256")]
    pub algorithm: String,
    /// `utf8` or `hex`
    #[arg(short, long, default_value = "utf8")]
    pub encoding: String,
}

#[derive(Args)]
pub struct KeygenArgs {
    #[arg(long, value_enum, default_value = "ed25519")]
    pub scheme: Scheme,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Scheme {
    Ed25519,
    Bls,
}

impl Scheme {
    /// Name of the keygen operation for this scheme.
    pub fn keygen_operation(self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519_keygen",
            Self::Bls => "bls_keygen",
        }
    }
}

#[derive(Args)]
pub struct ServeArgs {
    /// Overrides `bind_addr` from the config file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_call() {
        let cli = Cli::try_parse_from(["prims", "call", "random_int", "--args", r#"{"max":6}"#])
            .unwrap();
        if let Command::Call(args) = cli.command {
            assert_eq!(args.operation, "random_int");
            assert_eq!(args.args, r#"{"max":6}"#);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_call_default_args() {
        let cli = Cli::try_parse_from(["prims", "call", "random_uuid"]).unwrap();
        if let Command::Call(args) = cli.command {
            assert_eq!(args.args, "{}");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_ops() {
        let cli = Cli::try_parse_from(["prims", "ops"]).unwrap();
        assert!(matches!(cli.command, Command::Ops));
    }

    #[test]
    fn parse_hash_defaults() {
        let cli = Cli::try_parse_from(["prims", "hash", "hello world"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.data, "hello world");
            assert_eq!(args.algorithm, "SHA-256");
            assert_eq!(args.encoding, "utf8");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_hash_options() {
        let cli =
            Cli::try_parse_from(["prims", "hash", "6869", "-a", "BLAKE3", "-e", "hex"]).unwrap();
        if let Command::Hash(args) = cli.command {
            assert_eq!(args.algorithm, "BLAKE3");
            assert_eq!(args.encoding, "hex");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_keygen_scheme() {
        let cli = Cli::try_parse_from(["prims", "keygen"]).unwrap();
        if let Command::Keygen(args) = cli.command {
            assert_eq!(args.scheme, Scheme::Ed25519);
        } else {
            panic!("wrong command");
        }

        let cli = Cli::try_parse_from(["prims", "keygen", "--scheme", "bls"]).unwrap();
        if let Command::Keygen(args) = cli.command {
            assert_eq!(args.scheme.keygen_operation(), "bls_keygen");
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(Cli::try_parse_from(["prims", "keygen", "--scheme", "rsa"]).is_err());
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from([
            "prims",
            "serve",
            "--bind",
            "0.0.0.0:8080",
            "--config",
            "prims.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("prims.toml")));
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind, Some("0.0.0.0:8080".parse().unwrap()));
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn serve_rejects_bad_address() {
        assert!(Cli::try_parse_from(["prims", "serve", "--bind", "not-an-addr"]).is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["prims", "--verbose", "uuid"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_global_config_on_call() {
        let cli = Cli::try_parse_from(["prims", "call", "random_bytes", "--config", "limits.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("limits.toml")));
        assert!(matches!(cli.command, Command::Call(_)));
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["prims", "--format", "json", "ops"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
