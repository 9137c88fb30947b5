use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "greengrow", bin_name = "greengrow", version)]
#[command(about = "Seedling inventory and sales tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH", help_heading = "Options")]
    pub db: Option<PathBuf>,

    /// Log what greengrow is doing to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the store
    #[command(display_order = 1)]
    Init,

    /// Add a tree type to the catalog
    #[command(display_order = 2)]
    AddType {
        /// Unique name, e.g. Oak
        name: String,

        /// Base price per seedling, e.g. 10.00
        #[arg(allow_negative_numbers = true)]
        price: Decimal,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add a storage location
    #[command(display_order = 3)]
    AddLocation {
        /// Unique name, e.g. Greenhouse-A
        name: String,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Add seedlings of one type at one location
    #[command(display_order = 10)]
    Restock {
        /// Tree type name or id
        tree_type: String,

        /// Location name or id
        location: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Move seedlings between locations
    #[command(alias = "mv", display_order = 11)]
    Transfer {
        /// Tree type name or id
        tree_type: String,

        /// Location to take from
        from: String,

        /// Location to put into
        to: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Record a sale at the type's current base price
    #[command(display_order = 12)]
    Sell {
        /// Tree type name or id
        tree_type: String,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Only draw from this location
        #[arg(short, long)]
        location: Option<String>,
    },

    /// List stock entries with their estimated value
    #[command(alias = "stock", display_order = 20)]
    ListStock {
        /// Only this tree type (name or id)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        tree_type: Option<String>,

        /// Only this location (name or id)
        #[arg(short, long)]
        location: Option<String>,
    },

    /// List sales, optionally within a date range
    #[command(alias = "sales", display_order = 21)]
    ListSales {
        /// First day to include (YYYY-MM-DD, UTC)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD, UTC)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// List tree types
    #[command(alias = "types", display_order = 22)]
    ListTypes,

    /// List locations
    #[command(alias = "locations", display_order = 23)]
    ListLocations,

    /// Get or set configuration
    #[command(display_order = 30)]
    Config {
        /// Configuration key (database-path, sale-policy)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("greengrow").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_add_type_with_decimal_price() {
        let cli = parse(&["add-type", "Oak", "10.00", "-d", "Quercus robur"]);
        match cli.command {
            Commands::AddType {
                name,
                price,
                description,
            } => {
                assert_eq!(name, "Oak");
                assert_eq!(price, dec!(10.00));
                assert_eq!(description.as_deref(), Some("Quercus robur"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn negative_quantities_reach_validation() {
        let cli = parse(&["restock", "Oak", "Greenhouse-A", "-5"]);
        assert!(matches!(
            cli.command,
            Commands::Restock { quantity: -5, .. }
        ));
    }

    #[test]
    fn global_options_work_after_the_verb() {
        let cli = parse(&["list-stock", "--type", "Oak", "--db", "/tmp/x.db", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(
            cli.command,
            Commands::ListStock {
                tree_type: Some(_),
                location: None
            }
        ));
    }

    #[test]
    fn sale_dates_are_parsed() {
        let cli = parse(&["list-sales", "--from", "2024-03-01", "--to", "2024-03-31"]);
        match cli.command {
            Commands::ListSales { from, to } => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1));
                assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_input() {
        let argv = |args: &[&'static str]| {
            Cli::try_parse_from(std::iter::once("greengrow").chain(args.iter().copied()))
        };
        assert!(argv(&["sell", "Oak", "lots"]).is_err());
        assert!(argv(&["list-sales", "--from", "March"]).is_err());
        assert!(argv(&["plant"]).is_err());
    }
}
