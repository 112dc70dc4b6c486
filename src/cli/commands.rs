//! CLI commands and argument parsing

use crate::csc::SortField;
use crate::types::SortDirection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Commando webservice and CSC records CLI
#[derive(Parser, Debug)]
#[command(name = "commando-csc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a client's CSC from the webservice (act=cscliste)
    CscList {
        /// Client code
        #[arg(long)]
        client: String,
    },

    /// Backorder quantities (act=reliq)
    Backorders {
        /// Client code
        #[arg(long)]
        client: String,

        /// Product references (comma-separated, may be empty)
        #[arg(long, value_delimiter = ',')]
        refs: Vec<String>,
    },

    /// Stock availability (act=dispo)
    Stock {
        /// Product references (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        refs: Vec<String>,

        /// Include availability alert details
        #[arg(long)]
        alert: bool,
    },

    /// Client pricing (act=tarif)
    Pricing {
        /// Client code
        #[arg(long)]
        client: String,

        /// Product references (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        refs: Vec<String>,

        /// Include pricing calculation details
        #[arg(long)]
        full_info: bool,
    },

    /// Print a signed URL without sending the request
    Url {
        /// Query parameter as key=value, in signing order (repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },

    /// List CSC records
    List {
        /// Client code (fetches from the webservice, local file as fallback)
        #[arg(long)]
        client: Option<String>,

        /// Apply this user's overrides
        #[arg(long)]
        user: Option<String>,

        /// Only records with this status
        #[arg(long)]
        status: Option<String>,

        /// Only records with a product reference containing this text
        #[arg(long)]
        product_ref: Option<String>,

        /// Sort column: reference, dateDebut, dateFin, statut
        #[arg(long, default_value = "dateDebut")]
        sort: SortField,

        /// Sort direction: asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
    },

    /// Show one CSC record with its products
    Detail {
        /// CSC reference
        reference: String,

        /// Client code (fetches from the webservice, local file as fallback)
        #[arg(long)]
        client: Option<String>,

        /// Apply this user's overrides
        #[arg(long)]
        user: Option<String>,
    },

    /// Set the quantity a user claims for a product
    SetQuantity {
        /// User id
        #[arg(long)]
        user: String,

        /// CSC reference
        reference: String,

        /// Product reference
        product: String,

        /// Claimed quantity
        quantity: u32,
    },

    /// Set the status a user gives to a CSC
    SetStatus {
        /// User id
        #[arg(long)]
        user: String,

        /// CSC reference
        reference: String,

        /// New status (e.g. "Ouverte", "Clôturée", "En cours")
        status: String,
    },

    /// Check an attachment against the policy and show its stored name
    CheckAttachment {
        /// File name as sent by the customer
        name: String,

        /// Size in bytes
        #[arg(long)]
        size: u64,

        /// MIME type
        #[arg(long)]
        mime: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (single line)
    Json,
    /// Human-readable output
    Pretty,
}

/// Parse a `key=value` pair; the value may be empty
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("act=dispo").unwrap(),
            ("act".to_string(), "dispo".to_string())
        );
        assert_eq!(
            parse_key_val("ref=").unwrap(),
            ("ref".to_string(), String::new())
        );
        assert_eq!(
            parse_key_val("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=x").is_err());
    }

    #[test]
    fn test_cli_parses_url_params_in_order() {
        let cli = Cli::parse_from([
            "commando-csc",
            "url",
            "-p",
            "cli=42",
            "--param",
            "act=cscliste",
        ]);
        match cli.command {
            Commands::Url { params } => {
                assert_eq!(params[0].0, "cli");
                assert_eq!(params[1].0, "act");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_list() {
        let cli = Cli::parse_from([
            "commando-csc",
            "list",
            "--status",
            "Ouverte",
            "--sort",
            "dateFin",
            "--direction",
            "desc",
            "--format",
            "pretty",
        ]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::List {
                status,
                sort,
                direction,
                ..
            } => {
                assert_eq!(status.as_deref(), Some("Ouverte"));
                assert_eq!(sort, SortField::EndDate);
                assert_eq!(direction, SortDirection::Desc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_stock_refs_and_flag() {
        let cli = Cli::parse_from(["commando-csc", "stock", "--refs", "A1,B2", "--alert"]);
        match cli.command {
            Commands::Stock { refs, alert } => {
                assert_eq!(refs, vec!["A1".to_string(), "B2".to_string()]);
                assert!(alert);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_sort() {
        let result = Cli::try_parse_from(["commando-csc", "list", "--sort", "price"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_check_attachment() {
        let cli = Cli::parse_from([
            "commando-csc",
            "check-attachment",
            "facture 2024.pdf",
            "--size",
            "2048",
            "--mime",
            "application/pdf",
        ]);
        match cli.command {
            Commands::CheckAttachment { name, size, mime } => {
                assert_eq!(name, "facture 2024.pdf");
                assert_eq!(size, 2048);
                assert_eq!(mime, "application/pdf");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
