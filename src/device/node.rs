use std::fmt;
use std::str::FromStr;

/// Handle to one node of a device's capability tree.
///
/// Only meaningful for the device that handed it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Category,
    Integer,
    Float,
    Boolean,
    Enumeration,
    String,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessMode {
    NotAvailable,
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl AccessMode {
    pub fn is_readable(self) -> bool {
        matches!(self, AccessMode::ReadOnly | AccessMode::ReadWrite)
    }

    pub fn is_writable(self) -> bool {
        matches!(self, AccessMode::WriteOnly | AccessMode::ReadWrite)
    }

    pub fn from_flags(readable: bool, writable: bool) -> Self {
        match (readable, writable) {
            (true, true) => AccessMode::ReadWrite,
            (true, false) => AccessMode::ReadOnly,
            (false, true) => AccessMode::WriteOnly,
            (false, false) => AccessMode::NotAvailable,
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = match self {
            AccessMode::NotAvailable => "NA",
            AccessMode::ReadOnly => "RO",
            AccessMode::WriteOnly => "WO",
            AccessMode::ReadWrite => "RW",
        };
        f.write_str(short)
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NA" | "NotAvailable" => Ok(AccessMode::NotAvailable),
            "RO" | "ReadOnly" => Ok(AccessMode::ReadOnly),
            "WO" | "WriteOnly" => Ok(AccessMode::WriteOnly),
            "RW" | "ReadWrite" => Ok(AccessMode::ReadWrite),
            other => Err(format!("unknown access mode \"{}\"", other)),
        }
    }
}

/// Entry of an enumeration node: symbolic name and the integer the device uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub symbolic: String,
    pub value: i64,
}

impl EnumEntry {
    pub fn new(symbolic: impl Into<String>, value: i64) -> Self {
        Self {
            symbolic: symbolic.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Enumeration(EnumEntry),
    String(String),
    AccessMode(AccessMode),
    None,
}

impl NodeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NodeValue::Float(v) => Some(*v),
            NodeValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            NodeValue::Integer(v) => Some(*v),
            NodeValue::Enumeration(entry) => Some(entry.value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            NodeValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for NodeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeValue::Integer(v) => write!(f, "{}", v),
            NodeValue::Float(v) => write!(f, "{}", v),
            NodeValue::Boolean(v) => write!(f, "{}", v),
            NodeValue::Enumeration(entry) => f.write_str(&entry.symbolic),
            NodeValue::String(v) => f.write_str(v),
            NodeValue::AccessMode(mode) => write!(f, "{}", mode),
            NodeValue::None => Ok(()),
        }
    }
}

impl From<i64> for NodeValue {
    fn from(value: i64) -> Self {
        NodeValue::Integer(value)
    }
}

impl From<f64> for NodeValue {
    fn from(value: f64) -> Self {
        NodeValue::Float(value)
    }
}

impl From<bool> for NodeValue {
    fn from(value: bool) -> Self {
        NodeValue::Boolean(value)
    }
}

impl From<&str> for NodeValue {
    fn from(value: &str) -> Self {
        NodeValue::String(value.to_string())
    }
}
