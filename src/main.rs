//! Daisychain - anode bed ballast calculator
//!
//! Solves a daisy-chained cathodic protection circuit from a node store.
//!
//! # Usage
//!
//! ```bash
//! daisychain --store chain.json rectifiers
//! daisychain --store chain.json solve --rectifier 2ab --format csv --decimals 2
//! daisychain --store chain.json set 7 ib 250m
//! daisychain --store chain.json add 2ab 5 --label 4+000 --ra 3.1 --ia 0.4 --rc 0.2
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use daisychain_core::{
    chain::{parse_field_value, parse_value, Field, FieldEdit, NewNode, NodeId},
    error::{ChainError, Result},
    report::{write_csv, write_table, ReportConfig},
    store::JsonFileStore,
    Session, DEFAULT_STORE_FILE,
};

/// Ballast and rectifier sizing for daisy-chained anode beds
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the node store (JSON)
    #[arg(short, long, env = "DAISYCHAIN_STORE", default_value = DEFAULT_STORE_FILE)]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the rectifiers in the store
    Rectifiers,

    /// Solve one rectifier's chain
    Solve {
        /// Rectifier to solve (defaults to the first in the store)
        #[arg(short, long)]
        rectifier: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Decimals for every printed value (defaults: 3, source voltage 2)
        #[arg(short, long)]
        decimals: Option<usize>,

        /// Write the results back to the store
        #[arg(long)]
        save: bool,
    },

    /// Edit one input field of a node, then re-solve its chain
    Set {
        /// Node id
        id: u64,

        /// Field: ra, rb, ia, ib or rc
        field: String,

        /// New value (accepts m/k suffixes; empty clears the field)
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Keep the edit out of the store
        #[arg(long)]
        no_save: bool,
    },

    /// Enter a new node
    Add {
        /// Rectifier the node belongs to
        rectifier: String,

        /// Position along the chain (1 is next to the rectifier)
        index: u32,

        /// Chainage label
        #[arg(short, long, default_value = "")]
        label: String,

        /// Stage A resistance (ohms)
        #[arg(long, value_parser = parse_reading, allow_negative_numbers = true)]
        ra: Option<f64>,
        /// Stage B resistance (ohms)
        #[arg(long, value_parser = parse_reading, allow_negative_numbers = true)]
        rb: Option<f64>,
        /// Stage A current (amps)
        #[arg(long, value_parser = parse_reading, allow_negative_numbers = true)]
        ia: Option<f64>,
        /// Stage B current (amps)
        #[arg(long, value_parser = parse_reading, allow_negative_numbers = true)]
        ib: Option<f64>,
        /// Cable resistance toward the rectifier (ohms)
        #[arg(long, value_parser = parse_reading, allow_negative_numbers = true)]
        rc: Option<f64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Csv,
}

fn parse_reading(text: &str) -> std::result::Result<f64, String> {
    parse_value(text).ok_or_else(|| format!("'{}' is not a number", text))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut session = Session::open(JsonFileStore::new(&args.store))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Rectifiers => {
            for rectifier in session.rectifiers() {
                writeln!(out, "{}", rectifier)?;
            }
        }

        Command::Solve {
            rectifier,
            format,
            decimals,
            save,
        } => {
            if let Some(rectifier) = rectifier {
                session.select(&rectifier)?;
            }
            let config = report_config(decimals);
            print_solution(&session, format, &config, &mut out)?;
            if save {
                self::save(&mut session)?;
            }
        }

        Command::Set {
            id,
            field,
            value,
            no_save,
        } => {
            let id = NodeId(id);
            let field: Field = field.parse()?;
            let value = parse_field_value(field, &value)?;

            let rectifier = session
                .node(id)
                .map(|n| n.rectifier.clone())
                .ok_or(ChainError::NodeNotFound { id })?;
            session.select(&rectifier)?;
            session.apply_edit(FieldEdit { id, field, value })?;

            print_solution(&session, Format::Table, &ReportConfig::new(), &mut out)?;
            if !no_save {
                save(&mut session)?;
            }
        }

        Command::Add {
            rectifier,
            index,
            label,
            ra,
            rb,
            ia,
            ib,
            rc,
        } => {
            let node = session.add_node(NewNode {
                rectifier,
                index,
                label,
                resistance_a: ra,
                resistance_b: rb,
                current_a: ia,
                current_b: ib,
                cable_resistance: rc,
            })?;
            writeln!(
                out,
                "Added node {} ({} index {})",
                node.id, node.rectifier, node.index
            )?;
        }
    }

    Ok(())
}

fn report_config(decimals: Option<usize>) -> ReportConfig {
    match decimals {
        Some(d) => ReportConfig::new()
            .with_voltage_decimals(d)
            .with_current_decimals(d)
            .with_resistance_decimals(d)
            .with_source_decimals(d, d),
        None => ReportConfig::new(),
    }
}

fn print_solution<W: Write>(
    session: &Session<JsonFileStore>,
    format: Format,
    config: &ReportConfig,
    out: &mut W,
) -> Result<()> {
    let solution = session.solution();
    match format {
        Format::Table => {
            let warnings = session.warnings();
            write_table(session.nodes(), &solution, &warnings, config, out)
        }
        Format::Csv => write_csv(session.nodes(), &solution, config, out),
    }
}

fn save(session: &mut Session<JsonFileStore>) -> Result<()> {
    match session.save()? {
        0 => eprintln!("Nothing to save"),
        rows => eprintln!(
            "Saved {} nodes to {}",
            rows,
            session.store().path().display()
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use daisychain_core::chain::Node;
    use daisychain_core::solve;

    #[test]
    fn test_set_accepts_negative_value() {
        let args = Args::try_parse_from(["daisychain", "set", "3", "ia", "-0.5", "--no-save"]).unwrap();
        match args.command {
            Command::Set { id, value, no_save, .. } => {
                assert_eq!(id, 3);
                assert_eq!(value, "-0.5");
                assert!(no_save);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_add_accepts_negative_readings() {
        let args =
            Args::try_parse_from(["daisychain", "add", "9z", "1", "--ra", "-1", "--ib", "-0.25"]).unwrap();
        match args.command {
            Command::Add { ra, ib, rb, .. } => {
                assert_eq!(ra, Some(-1.0));
                assert_eq!(ib, Some(-0.25));
                assert_eq!(rb, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_store_defaults_to_chain_json() {
        let args = Args::try_parse_from(["daisychain", "rectifiers"]).unwrap();
        if std::env::var_os("DAISYCHAIN_STORE").is_none() {
            assert_eq!(args.store, PathBuf::from(DEFAULT_STORE_FILE));
        }
    }

    #[test]
    fn test_decimals_option_rounds_output() {
        let args =
            Args::try_parse_from(["daisychain", "solve", "--format", "csv", "--decimals", "1"]).unwrap();
        let decimals = match args.command {
            Command::Solve { decimals, .. } => decimals,
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(decimals, Some(1));

        let nodes = vec![Node::new(NodeId(1), "1a", 1)
            .with_branch_a(4.0, 0.5)
            .with_cable(0.6)];
        let solution = solve(&nodes, "1a");
        let mut out = Vec::new();
        write_csv(&nodes, &solution, &report_config(decimals), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // 2 V at the node, 0.3 V over the cable
        assert_eq!(lines[1], "1,,1,0.6,4,0.5,,,2.0,0.0,,0.5");
        assert_eq!(lines[2], "source,,,,,,,,2.3,,,0.5");
    }

    #[test]
    fn test_default_precision() {
        let config = report_config(None);
        assert_eq!(config.voltage_decimals, 3);
        assert_eq!(config.source_voltage_decimals, 2);
    }
}
