//! Generic node command dispatcher.
//!
//! Every configuration helper funnels through [`invoke_node`]: resolve a dotted
//! node path on the device's capability tree, optionally check the node's
//! access mode, turn a symbolic `Namespace.Member` argument into the device's
//! enumeration entry, and run one of the node methods.

use std::fmt;
use std::str::FromStr;

use log::info;

use crate::device::{AccessMode, NodeId, NodeMap, NodeValue};
use crate::error::{CameraError, CameraResult};

/// Dotted path into the capability tree, e.g. `TLStream.StreamBufferHandlingMode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath {
    raw: String,
}

impl NodePath {
    pub fn parse(path: &str) -> CameraResult<Self> {
        if let Some(empty) = path.split('.').find(|segment| segment.is_empty()) {
            return Err(CameraError::resolution(path, empty));
        }
        Ok(Self {
            raw: path.to_string(),
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for NodePath {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodePath::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GetValue,
    SetValue,
    GetMin,
    GetMax,
    GetAccessMode,
    Execute,
}

impl Method {
    fn takes_argument(self) -> bool {
        self == Method::SetValue
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::GetValue => "GetValue",
            Method::SetValue => "SetValue",
            Method::GetMin => "GetMin",
            Method::GetMax => "GetMax",
            Method::GetAccessMode => "GetAccessMode",
            Method::Execute => "Execute",
        };
        f.write_str(name)
    }
}

impl FromStr for Method {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GetValue" => Ok(Method::GetValue),
            "SetValue" => Ok(Method::SetValue),
            "GetMin" => Ok(Method::GetMin),
            "GetMax" => Ok(Method::GetMax),
            "GetAccessMode" => Ok(Method::GetAccessMode),
            "Execute" => Ok(Method::Execute),
            other => Err(CameraError::UnknownMethod(other.to_string())),
        }
    }
}

/// Argument passed to a node method.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Value(NodeValue),
    /// Enumeration constant looked up on the device, e.g. `ExposureAuto.Off`.
    Symbol { namespace: String, member: String },
}

impl Argument {
    /// Parses `Namespace.Member`. Nested symbols are not supported.
    pub fn symbol(text: &str) -> CameraResult<Self> {
        let segments: Vec<&str> = text.split('.').collect();
        match segments.as_slice() {
            [namespace, member] if !namespace.is_empty() && !member.is_empty() => {
                Ok(Argument::Symbol {
                    namespace: namespace.to_string(),
                    member: member.to_string(),
                })
            }
            [_, _, _, ..] => Err(CameraError::unsupported_argument(format!(
                "nested symbolic arguments are not supported: \"{}\"",
                text
            ))),
            _ => Err(CameraError::unsupported_argument(format!(
                "expected \"Namespace.Member\", got \"{}\"",
                text
            ))),
        }
    }

    /// Parses an argument typed on a command line: booleans and numbers
    /// become literal values, dotted words become symbols, anything else is
    /// passed through as a string.
    pub fn parse(text: &str) -> CameraResult<Self> {
        if let Ok(v) = text.parse::<bool>() {
            return Ok(Argument::Value(NodeValue::Boolean(v)));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Argument::Value(NodeValue::Integer(v)));
        }
        if let Ok(v) = text.parse::<f64>() {
            return Ok(Argument::Value(NodeValue::Float(v)));
        }
        if text.contains('.') {
            return Argument::symbol(text);
        }
        Ok(Argument::Value(NodeValue::String(text.to_string())))
    }

    fn resolve<M: NodeMap + ?Sized>(self, device: &M) -> CameraResult<NodeValue> {
        match self {
            Argument::Value(value) => Ok(value),
            Argument::Symbol { namespace, member } => device
                .enum_entry(&namespace, &member)
                .map(NodeValue::Enumeration)
                .ok_or_else(|| CameraError::resolution(format!("{}.{}", namespace, member), member)),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(value) => write!(f, "{}", value),
            Argument::Symbol { namespace, member } => write!(f, "{}.{}", namespace, member),
        }
    }
}

impl From<NodeValue> for Argument {
    fn from(value: NodeValue) -> Self {
        Argument::Value(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Value(NodeValue::Float(value))
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Value(NodeValue::Integer(value))
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Value(NodeValue::Boolean(value))
    }
}

/// Walks `path` from the root, failing on the first missing segment.
pub fn resolve<M: NodeMap + ?Sized>(device: &M, path: &NodePath) -> CameraResult<NodeId> {
    let mut node = device.root();
    for segment in path.segments() {
        node = device
            .child(node, segment)
            .ok_or_else(|| CameraError::resolution(path.as_str(), segment))?;
    }
    Ok(node)
}

pub fn invoke<M: NodeMap + ?Sized>(
    device: &mut M,
    path: &str,
    method: Method,
    expected: Option<AccessMode>,
    argument: Option<Argument>,
) -> CameraResult<NodeValue> {
    let path = NodePath::parse(path)?;
    let node = resolve(&*device, &path)?;
    invoke_node(device, &path, node, method, expected, argument)
}

/// Runs `method` on an already resolved node.
pub fn invoke_node<M: NodeMap + ?Sized>(
    device: &mut M,
    path: &NodePath,
    node: NodeId,
    method: Method,
    expected: Option<AccessMode>,
    argument: Option<Argument>,
) -> CameraResult<NodeValue> {
    match &argument {
        Some(arg) => info!("Executing: \"{}.{}({})\"", path, method, arg),
        None => info!("Executing: \"{}.{}()\"", path, method),
    }

    if let Some(expected) = expected {
        let actual = device.access_mode(node)?;
        if actual != expected {
            return Err(CameraError::AccessMode {
                path: path.to_string(),
                expected,
                actual,
            });
        }
    }

    let argument = match argument {
        Some(_) if !method.takes_argument() => {
            return Err(CameraError::unsupported_argument(format!(
                "{} takes no argument",
                method
            )))
        }
        Some(arg) => Some(arg.resolve(&*device)?),
        None if method.takes_argument() => {
            return Err(CameraError::unsupported_argument(format!(
                "{} requires an argument",
                method
            )))
        }
        None => None,
    };

    let result = match (method, argument) {
        (Method::GetValue, _) => device.value(node)?,
        (Method::SetValue, Some(value)) => {
            device.set_value(node, value)?;
            NodeValue::None
        }
        (Method::SetValue, None) => NodeValue::None,
        (Method::GetMin, _) => device.min(node)?,
        (Method::GetMax, _) => device.max(node)?,
        (Method::GetAccessMode, _) => NodeValue::AccessMode(device.access_mode(node)?),
        (Method::Execute, _) => {
            device.execute(node)?;
            NodeValue::None
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{Device, EnumEntry, SimulatedDevice, SimulationConfig};

    fn initialized() -> SimulatedDevice {
        let mut device = SimulatedDevice::new("DISPATCH", SimulationConfig::default());
        device.init().unwrap();
        device
    }

    #[test]
    fn test_resolves_nested_path() {
        let device = initialized();
        let path = NodePath::parse("TLStream.StreamBufferHandlingMode").unwrap();
        assert!(resolve(&device, &path).is_ok());
    }

    #[test]
    fn test_missing_middle_segment_fails_resolution() {
        let mut device = initialized();
        let err = invoke(&mut device, "Gain.Missing.Value", Method::GetValue, None, None).unwrap_err();
        match err {
            CameraError::Resolution { path, segment } => {
                assert_eq!(path, "Gain.Missing.Value");
                assert_eq!(segment, "Missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_segment_rejected() {
        assert!(matches!(NodePath::parse("TLStream..Mode"), Err(CameraError::Resolution { .. })));
        assert!(matches!(NodePath::parse(""), Err(CameraError::Resolution { .. })));
    }

    #[test]
    fn test_access_mode_mismatch() {
        let mut device = initialized();
        // Gain stays read-only while GainAuto is Continuous.
        let err = invoke(
            &mut device,
            "Gain",
            Method::SetValue,
            Some(AccessMode::ReadWrite),
            Some(Argument::from(0.0)),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CameraError::AccessMode {
                expected: AccessMode::ReadWrite,
                actual: AccessMode::ReadOnly,
                ..
            }
        ));
    }

    #[test]
    fn test_symbolic_argument_resolves_to_entry() {
        let mut device = initialized();
        let arg = Argument::symbol("StreamBufferHandlingMode.NewestOnly").unwrap();
        invoke(
            &mut device,
            "TLStream.StreamBufferHandlingMode",
            Method::SetValue,
            Some(AccessMode::ReadWrite),
            Some(arg),
        )
        .unwrap();

        let value = invoke(&mut device, "TLStream.StreamBufferHandlingMode", Method::GetValue, None, None).unwrap();
        assert_eq!(value, NodeValue::Enumeration(EnumEntry::new("NewestOnly", 3)));
    }

    #[test]
    fn test_nested_symbol_unsupported() {
        assert!(matches!(
            Argument::symbol("Vendor.AcquisitionMode.Continuous"),
            Err(CameraError::UnsupportedArgument(_))
        ));
        assert!(matches!(Argument::symbol("NoDot"), Err(CameraError::UnsupportedArgument(_))));
        assert!(matches!(Argument::parse("A.B.C"), Err(CameraError::UnsupportedArgument(_))));
    }

    #[test]
    fn test_unknown_symbol_fails_resolution() {
        let mut device = initialized();
        let err = invoke(
            &mut device,
            "AcquisitionMode",
            Method::SetValue,
            None,
            Some(Argument::symbol("AcquisitionMode.Burst").unwrap()),
        )
        .unwrap_err();
        assert!(matches!(err, CameraError::Resolution { segment, .. } if segment == "Burst"));
    }

    #[test]
    fn test_argument_parsing() {
        assert_eq!(Argument::parse("0").unwrap(), Argument::from(0i64));
        assert_eq!(Argument::parse("2.5").unwrap(), Argument::from(2.5));
        assert_eq!(Argument::parse("true").unwrap(), Argument::from(true));
        assert_eq!(
            Argument::parse("GainAuto.Off").unwrap(),
            Argument::Symbol {
                namespace: "GainAuto".to_string(),
                member: "Off".to_string()
            }
        );
        assert_eq!(
            Argument::parse("Mode7").unwrap(),
            Argument::Value(NodeValue::String("Mode7".to_string()))
        );
    }

    #[test]
    fn test_method_argument_arity() {
        let mut device = initialized();
        assert!(matches!(
            invoke(&mut device, "Gamma", Method::SetValue, None, None),
            Err(CameraError::UnsupportedArgument(_))
        ));
        assert!(matches!(
            invoke(&mut device, "Gamma", Method::GetMax, None, Some(Argument::from(1.0))),
            Err(CameraError::UnsupportedArgument(_))
        ));
        assert_eq!(
            invoke(&mut device, "Gamma", Method::GetMax, None, None).unwrap(),
            NodeValue::Float(4.0)
        );
    }

    #[test]
    fn test_method_names() {
        assert_eq!("GetMin".parse::<Method>().unwrap(), Method::GetMin);
        assert!(matches!("Frobnicate".parse::<Method>(), Err(CameraError::UnknownMethod(_))));
    }

    #[test]
    fn test_device_errors_propagate() {
        let mut device = initialized();
        let err = invoke(&mut device, "Gamma", Method::SetValue, None, Some(Argument::from(100.0))).unwrap_err();
        assert!(matches!(err, CameraError::Device(_)));
    }

    #[test]
    fn test_execute_command_node() {
        let mut device = initialized();
        invoke(&mut device, "AcquisitionStart", Method::Execute, Some(AccessMode::WriteOnly), None).unwrap();
        assert!(device.is_streaming());
    }
}
