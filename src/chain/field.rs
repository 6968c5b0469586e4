//! Editable input fields and value parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NodeId;
use crate::error::{ChainError, Result};

/// An input field of a node that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Stage A resistance (ohms)
    ResistanceA,
    /// Stage B resistance (ohms)
    ResistanceB,
    /// Stage A measured current (amps)
    CurrentA,
    /// Stage B measured current (amps)
    CurrentB,
    /// Source-side cable resistance (ohms)
    CableResistance,
}

impl Field {
    /// All editable fields, in form order.
    pub const ALL: [Field; 5] = [
        Field::CableResistance,
        Field::ResistanceA,
        Field::CurrentA,
        Field::ResistanceB,
        Field::CurrentB,
    ];

    /// Short column name.
    pub fn short_name(&self) -> &'static str {
        match self {
            Field::ResistanceA => "ra",
            Field::ResistanceB => "rb",
            Field::CurrentA => "ia",
            Field::CurrentB => "ib",
            Field::CableResistance => "rc",
        }
    }

    /// Unit symbol for display.
    pub fn unit(&self) -> &'static str {
        match self {
            Field::CurrentA | Field::CurrentB => "A",
            _ => "Ω",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for Field {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "ra" | "resistance-a" => Ok(Field::ResistanceA),
            "rb" | "resistance-b" => Ok(Field::ResistanceB),
            "ia" | "current-a" => Ok(Field::CurrentA),
            "ib" | "current-b" => Ok(Field::CurrentB),
            "rc" | "cable" | "cable-resistance" => Ok(Field::CableResistance),
            _ => Err(ChainError::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

/// One of the two parallel branches at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    A,
    B,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::A => f.write_str("A"),
            Stage::B => f.write_str("B"),
        }
    }
}

/// A single field edit coming from the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldEdit {
    pub id: NodeId,
    pub field: Field,
    /// New value; `None` or non-finite clears the field.
    pub value: Option<f64>,
}

impl FieldEdit {
    /// Create an edit that sets a value.
    pub fn new(id: NodeId, field: Field, value: f64) -> Self {
        Self {
            id,
            field,
            value: Some(value),
        }
    }

    /// Create an edit that clears a field.
    pub fn clear(id: NodeId, field: Field) -> Self {
        Self {
            id,
            field,
            value: None,
        }
    }
}

/// Parse a number string with optional engineering suffix.
///
/// `250m` is 0.25, `1.2k` is 1200. Returns `None` for anything else.
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let last = text.chars().last()?;

    let multiplier = match last {
        'u' | 'µ' => 1e-6,
        'm' => 1e-3,
        'k' | 'K' => 1e3,
        'M' => 1e6,
        _ => 1.0,
    };
    let num_str = if multiplier != 1.0 {
        &text[..text.len() - last.len_utf8()]
    } else {
        text
    };

    num_str
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
}

/// Parse an edit value; an empty string clears the field.
pub fn parse_field_value(field: Field, text: &str) -> Result<Option<f64>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_value(text)
        .map(Some)
        .ok_or_else(|| ChainError::invalid_value(field.short_name(), text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Option<f64>, b: Option<f64>) -> bool {
        match (a, b) {
            (Some(x), Some(y)) => (x - y).abs() < x.abs() * 1e-10 + 1e-15,
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_parse_value() {
        assert!(approx_eq(parse_value("250m"), Some(0.25)));
        assert!(approx_eq(parse_value("1.2k"), Some(1200.0)));
        assert!(approx_eq(parse_value("0.035"), Some(0.035)));
        assert!(approx_eq(parse_value("-4"), Some(-4.0)));
        assert!(approx_eq(parse_value("1e-3"), Some(1e-3)));
        assert!(approx_eq(parse_value("ohm"), None));
        assert!(approx_eq(parse_value("NaN"), None));
        assert!(approx_eq(parse_value(""), None));
    }

    #[test]
    fn test_field_names() {
        assert_eq!("ra".parse::<Field>().unwrap(), Field::ResistanceA);
        assert_eq!("Current_B".parse::<Field>().unwrap(), Field::CurrentB);
        assert_eq!("cable".parse::<Field>().unwrap(), Field::CableResistance);
        assert!(matches!(
            "rx".parse::<Field>(),
            Err(ChainError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_empty_value_clears() {
        assert_eq!(parse_field_value(Field::CurrentA, "  ").unwrap(), None);
        assert!(parse_field_value(Field::CurrentA, "abc").is_err());
    }
}
