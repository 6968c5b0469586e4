//! Result formatting.
//!
//! Rounding only happens here; the solver keeps full precision. Values
//! that were never entered or do not apply print as `--`, which is kept
//! distinct from a computed zero.

use std::io::Write;

use crate::chain::{ChainWarning, Node};
use crate::error::Result;
use crate::solver::ChainSolution;

/// Placeholder for an absent value.
pub const NOT_APPLICABLE: &str = "--";

/// Display precision.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Decimals for node voltages.
    pub voltage_decimals: usize,
    /// Decimals for currents.
    pub current_decimals: usize,
    /// Decimals for resistances.
    pub resistance_decimals: usize,
    /// Decimals for the rectifier voltage.
    pub source_voltage_decimals: usize,
    /// Decimals for the rectifier current.
    pub source_current_decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            voltage_decimals: 3,
            current_decimals: 3,
            resistance_decimals: 3,
            source_voltage_decimals: 2,
            source_current_decimals: 3,
        }
    }
}

impl ReportConfig {
    /// Create a configuration with default precision.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set decimals for node voltages.
    pub fn with_voltage_decimals(mut self, decimals: usize) -> Self {
        self.voltage_decimals = decimals;
        self
    }

    /// Set decimals for currents.
    pub fn with_current_decimals(mut self, decimals: usize) -> Self {
        self.current_decimals = decimals;
        self
    }

    /// Set decimals for resistances.
    pub fn with_resistance_decimals(mut self, decimals: usize) -> Self {
        self.resistance_decimals = decimals;
        self
    }

    /// Set decimals for the rectifier summary.
    pub fn with_source_decimals(mut self, voltage: usize, current: usize) -> Self {
        self.source_voltage_decimals = voltage;
        self.source_current_decimals = current;
        self
    }
}

/// Format an optional value, `--` when absent.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// One display row: inputs as entered, results rounded.
struct Row {
    index: String,
    label: String,
    id: String,
    rc: String,
    ra: String,
    ia: String,
    rb: String,
    ib: String,
    voltage: String,
    ballast_a: String,
    ballast_b: String,
    link: String,
}

impl Row {
    const HEADERS: [&'static str; 12] = [
        "Node", "Label", "ID", "Rc", "Ra", "Ia", "Rb", "Ib", "V", "Reo A", "Reo B", "I link",
    ];

    fn cells(&self) -> [&str; 12] {
        [
            self.index.as_str(),
            self.label.as_str(),
            self.id.as_str(),
            self.rc.as_str(),
            self.ra.as_str(),
            self.ia.as_str(),
            self.rb.as_str(),
            self.ib.as_str(),
            self.voltage.as_str(),
            self.ballast_a.as_str(),
            self.ballast_b.as_str(),
            self.link.as_str(),
        ]
    }
}

fn input(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => v.to_string(),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Rows nearest the source first.
fn rows(nodes: &[Node], solution: &ChainSolution, config: &ReportConfig) -> Vec<Row> {
    solution
        .display_order()
        .filter_map(|result| {
            let node = nodes.iter().find(|n| n.id == result.id)?;
            Some(Row {
                index: node.index.to_string(),
                label: node.label.clone(),
                id: node.id.0.to_string(),
                rc: input(node.cable_resistance),
                ra: input(node.resistance_a),
                ia: input(node.current_a),
                rb: input(node.resistance_b),
                ib: input(node.current_b),
                voltage: format_value(Some(result.voltage), config.voltage_decimals),
                ballast_a: format_value(result.ballast_a, config.resistance_decimals),
                ballast_b: format_value(result.ballast_b, config.resistance_decimals),
                link: format_value(Some(result.link_current), config.current_decimals),
            })
        })
        .collect()
}

/// Write a solved chain as an aligned text table with a summary line.
pub fn write_table<W: Write>(
    nodes: &[Node],
    solution: &ChainSolution,
    warnings: &[ChainWarning],
    config: &ReportConfig,
    writer: &mut W,
) -> Result<()> {
    writeln!(writer, "Rectifier {}", solution.rectifier)?;
    writeln!(
        writer,
        "Source voltage: {:.*} V   Total current: {:.*} A",
        config.source_voltage_decimals,
        solution.source.voltage,
        config.source_current_decimals,
        solution.source.current
    )?;
    writeln!(writer)?;

    let rows = rows(nodes, solution, config);
    if rows.is_empty() {
        writeln!(writer, "(no nodes)")?;
        return Ok(());
    }

    let mut widths = Row::HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = Row::HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:>w$}", h, w = w))
        .collect();
    writeln!(writer, "{}", header.join("  "))?;
    for row in &rows {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:>w$}", c, w = w))
            .collect();
        writeln!(writer, "{}", cells.join("  "))?;
    }

    if !warnings.is_empty() {
        writeln!(writer)?;
        for warning in warnings {
            writeln!(writer, "warning: {}", warning)?;
        }
    }
    Ok(())
}

/// Write a solved chain as CSV.
///
/// Format:
/// ```csv
/// node,label,id,rc,ra,ia,rb,ib,voltage,ballast_a,ballast_b,link_current
/// 1,0+000,1,2,5,1,,,16.000,11.000,,5.000
/// ```
///
/// Absent values are empty fields. The source quantities follow as a
/// final `source` row.
pub fn write_csv<W: Write>(
    nodes: &[Node],
    solution: &ChainSolution,
    config: &ReportConfig,
    writer: &mut W,
) -> Result<()> {
    writeln!(
        writer,
        "node,label,id,rc,ra,ia,rb,ib,voltage,ballast_a,ballast_b,link_current"
    )?;
    for row in rows(nodes, solution, config) {
        let cells: Vec<String> = row
            .cells()
            .iter()
            .map(|c| if *c == NOT_APPLICABLE { String::new() } else { csv_field(c) })
            .collect();
        writeln!(writer, "{}", cells.join(","))?;
    }
    writeln!(
        writer,
        "source,,,,,,,,{:.*},,,{:.*}",
        config.source_voltage_decimals,
        solution.source.voltage,
        config.source_current_decimals,
        solution.source.current
    )?;
    Ok(())
}

fn csv_field(text: &str) -> String {
    if text.contains(&[',', '"', '\n'][..]) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::NodeId;
    use crate::solver::solve;

    fn chain() -> Vec<Node> {
        vec![
            Node::new(NodeId(1), "1a", 1)
                .with_label("0+000")
                .with_branch_a(5.0, 1.0)
                .with_cable(2.0),
            Node::new(NodeId(2), "1a", 2)
                .with_label("1+000")
                .with_branch_a(4.0, 3.0)
                .with_branch_b(1.0, 1.0)
                .with_cable(1.0),
        ]
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(0.0), 3), "0.000");
        assert_eq!(format_value(None, 3), "--");
        assert_eq!(format_value(Some(-4.0), 2), "-4.00");
        assert_eq!(format_value(Some(f64::NAN), 2), "--");
    }

    #[test]
    fn test_csv_output() {
        let nodes = chain();
        let solution = solve(&nodes, "1a");
        let mut out = Vec::new();
        write_csv(&nodes, &solution, &ReportConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "1,0+000,1,2,5,1,,,16.000,11.000,,5.000");
        assert_eq!(lines[2], "2,1+000,2,1,4,3,1,1,12.000,0.000,11.000,4.000");
        assert_eq!(lines[3], "source,,,,,,,,26.00,,,5.000");
    }

    #[test]
    fn test_table_output() {
        let nodes = chain();
        let solution = solve(&nodes, "1a");
        let mut out = Vec::new();
        write_table(&nodes, &solution, &[], &ReportConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Source voltage: 26.00 V   Total current: 5.000 A"));
        assert!(text.contains("16.000"));
        assert!(!text.contains("warning"));
    }

    #[test]
    fn test_table_empty_chain() {
        let solution = solve(&[], "1a");
        let mut out = Vec::new();
        write_table(&[], &solution, &[], &ReportConfig::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Source voltage: 0.00 V"));
        assert!(text.contains("(no nodes)"));
    }

    #[test]
    fn test_csv_quotes_labels() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("2+000"), "2+000");
    }
}
