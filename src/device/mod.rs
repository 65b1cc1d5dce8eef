//! Boundary to the vendor camera SDK.
//!
//! The SDK's driver, transport and node map live outside this crate. A
//! backend implements [`CameraSystem`] for discovery and [`Device`] for each
//! connected camera; everything else in the crate only talks to these traits.

mod node;
pub mod simulated;

use ndarray::Array2;

use crate::error::DeviceError;

pub use node::{AccessMode, EnumEntry, NodeId, NodeValue};
pub use simulated::{ScriptedFrame, SimulatedDevice, SimulatedProbe, SimulatedSystem, SimulationConfig};

pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

/// Entry point of a backend: lists connected cameras.
pub trait CameraSystem {
    fn cameras(&mut self) -> DeviceResult<Vec<Box<dyn Device>>>;

    /// Whether the SDK still holds references to cameras or buffers.
    fn is_in_use(&self) -> bool;
}

/// A device's capability tree.
pub trait NodeMap {
    fn root(&self) -> NodeId;

    /// Looks up `name` directly below `parent`.
    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId>;

    fn access_mode(&self, node: NodeId) -> DeviceResult<AccessMode>;

    fn value(&self, node: NodeId) -> DeviceResult<NodeValue>;

    fn set_value(&mut self, node: NodeId, value: NodeValue) -> DeviceResult<()>;

    fn min(&self, node: NodeId) -> DeviceResult<NodeValue>;

    fn max(&self, node: NodeId) -> DeviceResult<NodeValue>;

    fn execute(&mut self, node: NodeId) -> DeviceResult<()>;

    /// Resolves `namespace.member` against the device's enumeration symbols.
    fn enum_entry(&self, namespace: &str, member: &str) -> Option<EnumEntry>;
}

pub trait Device: NodeMap {
    fn serial(&self) -> String;

    fn is_valid(&self) -> bool;

    fn is_initialized(&self) -> bool;

    fn is_streaming(&self) -> bool;

    fn init(&mut self) -> DeviceResult<()>;

    fn deinit(&mut self) -> DeviceResult<()>;

    fn begin_acquisition(&mut self) -> DeviceResult<()>;

    fn end_acquisition(&mut self) -> DeviceResult<()>;

    /// Blocks until the device hands out its next buffer.
    fn next_frame(&mut self) -> DeviceResult<Box<dyn RawFrame>>;
}

/// A buffer borrowed from the device. Must be released exactly once.
pub trait RawFrame {
    fn is_incomplete(&self) -> bool;

    /// Pixel data as rows x columns.
    fn pixels(&self) -> DeviceResult<Array2<u16>>;

    fn timestamp(&self) -> u64;

    fn bits_per_pixel(&self) -> u32;

    fn release(&mut self) -> DeviceResult<()>;
}
