//! Simulated camera backend.
//!
//! Mimics a GenICam camera closely enough for the demo binary and the tests:
//! nodes are unavailable until `init`, manual controls only become writable
//! once their auto mode is off, format nodes lock while streaming, and frame
//! buffers come from a small pool that must be released.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use log::{debug, trace};
use ndarray::Array2;
use rand::Rng;
use serde::Deserialize;

use super::node::NodeKind;
use super::{
    AccessMode, CameraSystem, Device, DeviceResult, EnumEntry, NodeId, NodeMap, NodeValue, RawFrame,
};
use crate::error::DeviceError;

/// Number of buffers the simulated driver can hand out at once.
pub const BUFFER_POOL_SIZE: usize = 10;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// Peak-to-peak noise amplitude added to generated frames, in counts.
    pub noise: u16,
    /// Every n-th generated frame is delivered incomplete when set.
    pub incomplete_every: Option<usize>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            bits_per_pixel: 16,
            noise: 64,
            incomplete_every: None,
        }
    }
}

/// A frame queued by a test, delivered before any generated frame.
#[derive(Debug, Clone)]
pub struct ScriptedFrame {
    pub incomplete: bool,
    pub pixels: Array2<u16>,
    pub timestamp: Option<u64>,
}

impl ScriptedFrame {
    pub fn complete(pixels: Array2<u16>, timestamp: u64) -> Self {
        Self {
            incomplete: false,
            pixels,
            timestamp: Some(timestamp),
        }
    }

    pub fn filled(rows: usize, cols: usize, value: u16, timestamp: u64) -> Self {
        Self::complete(Array2::from_elem((rows, cols), value), timestamp)
    }

    pub fn incomplete(rows: usize, cols: usize) -> Self {
        Self {
            incomplete: true,
            pixels: Array2::zeros((rows, cols)),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Condition {
    EnumIs(&'static str, &'static str),
    BoolIs(&'static str, bool),
}

#[derive(Debug, Clone)]
enum Access {
    ReadOnly,
    ReadWrite,
    WriteOnly,
    /// Writable until acquisition starts.
    Idle,
    /// Writable only while every condition holds.
    When(Vec<Condition>),
}

#[derive(Debug, Clone)]
struct SimNode {
    name: String,
    kind: NodeKind,
    access: Access,
    value: NodeValue,
    range: Option<(f64, f64)>,
    entries: Vec<EnumEntry>,
    children: Vec<NodeId>,
}

impl SimNode {
    fn new(name: &str, kind: NodeKind, access: Access, value: NodeValue) -> Self {
        Self {
            name: name.to_string(),
            kind,
            access,
            value,
            range: None,
            entries: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CallCounts {
    pub init: usize,
    pub deinit: usize,
    pub begin_acquisition: usize,
    pub end_acquisition: usize,
    pub frames_delivered: usize,
}

#[derive(Debug)]
struct SimCamera {
    serial: String,
    config: SimulationConfig,
    valid: bool,
    initialized: bool,
    streaming: bool,
    nodes: Vec<SimNode>,
    by_name: HashMap<String, NodeId>,
    outstanding: usize,
    generated: usize,
    clock_ns: u64,
    script: VecDeque<ScriptedFrame>,
    fail_next_frame: Option<String>,
    fail_next_end_acquisition: Option<String>,
    fail_next_deinit: Option<String>,
    calls: CallCounts,
}

impl SimCamera {
    fn new(serial: &str, config: SimulationConfig) -> Self {
        let mut camera = Self {
            serial: serial.to_string(),
            config,
            valid: true,
            initialized: false,
            streaming: false,
            nodes: Vec::new(),
            by_name: HashMap::new(),
            outstanding: 0,
            generated: 0,
            clock_ns: 0,
            script: VecDeque::new(),
            fail_next_frame: None,
            fail_next_end_acquisition: None,
            fail_next_deinit: None,
            calls: CallCounts::default(),
        };
        camera.build_tree();
        camera
    }

    fn add(&mut self, parent: Option<NodeId>, node: SimNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_name.insert(node.name.clone(), id);
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn add_float(&mut self, parent: NodeId, name: &str, access: Access, value: f64, range: (f64, f64)) {
        let mut node = SimNode::new(name, NodeKind::Float, access, NodeValue::Float(value));
        node.range = Some(range);
        self.add(Some(parent), node);
    }

    fn add_enum(&mut self, parent: NodeId, name: &str, access: Access, entries: &[(&str, i64)], current: &str) {
        let entries: Vec<EnumEntry> = entries
            .iter()
            .map(|(symbolic, value)| EnumEntry::new(*symbolic, *value))
            .collect();
        let value = entries
            .iter()
            .find(|entry| entry.symbolic == current)
            .cloned()
            .map(NodeValue::Enumeration)
            .unwrap_or(NodeValue::None);
        let mut node = SimNode::new(name, NodeKind::Enumeration, access, value);
        node.entries = entries;
        self.add(Some(parent), node);
    }

    fn build_tree(&mut self) {
        let root = self.add(
            None,
            SimNode::new("Root", NodeKind::Category, Access::ReadOnly, NodeValue::None),
        );

        let serial = self.serial.clone();
        self.add(
            Some(root),
            SimNode::new("DeviceSerialNumber", NodeKind::String, Access::ReadOnly, NodeValue::String(serial)),
        );
        self.add(
            Some(root),
            SimNode::new(
                "DeviceModelName",
                NodeKind::String,
                Access::ReadOnly,
                NodeValue::String("Simulated Mono Camera".to_string()),
            ),
        );

        for (name, size) in [("Width", self.config.width), ("Height", self.config.height)] {
            let mut node = SimNode::new(name, NodeKind::Integer, Access::ReadOnly, NodeValue::Integer(size as i64));
            node.range = Some((1.0, size as f64));
            self.add(Some(root), node);
        }

        let pixel_format = if self.config.bits_per_pixel > 8 { "Mono16" } else { "Mono8" };
        self.add_enum(root, "PixelFormat", Access::Idle, &[("Mono8", 0), ("Mono16", 1)], pixel_format);
        self.add_enum(
            root,
            "AcquisitionMode",
            Access::Idle,
            &[("Continuous", 0), ("SingleFrame", 1), ("MultiFrame", 2)],
            "Continuous",
        );
        self.add_enum(
            root,
            "VideoMode",
            Access::Idle,
            &[
                ("Mode0", 0),
                ("Mode1", 1),
                ("Mode2", 2),
                ("Mode3", 3),
                ("Mode4", 4),
                ("Mode5", 5),
                ("Mode6", 6),
                ("Mode7", 7),
            ],
            "Mode0",
        );

        let auto_entries = [("Off", 0), ("Once", 1), ("Continuous", 2)];
        self.add_enum(root, "ExposureAuto", Access::ReadWrite, &auto_entries, "Continuous");
        self.add_float(
            root,
            "ExposureTime",
            Access::When(vec![Condition::EnumIs("ExposureAuto", "Off")]),
            10_000.0,
            (6.0, 30_000_000.0),
        );
        self.add_enum(root, "GainAuto", Access::ReadWrite, &auto_entries, "Continuous");
        self.add_float(
            root,
            "Gain",
            Access::When(vec![Condition::EnumIs("GainAuto", "Off")]),
            0.0,
            (0.0, 47.99),
        );

        self.add(
            Some(root),
            SimNode::new(
                "AcquisitionFrameRateEnabled",
                NodeKind::Boolean,
                Access::ReadWrite,
                NodeValue::Boolean(false),
            ),
        );
        self.add_enum(
            root,
            "AcquisitionFrameRateAuto",
            Access::ReadWrite,
            &[("Off", 0), ("Continuous", 2)],
            "Continuous",
        );
        self.add_float(
            root,
            "AcquisitionFrameRate",
            Access::When(vec![
                Condition::BoolIs("AcquisitionFrameRateEnabled", true),
                Condition::EnumIs("AcquisitionFrameRateAuto", "Off"),
            ]),
            30.0,
            (1.0, 200.0),
        );
        self.add_float(root, "Gamma", Access::ReadWrite, 0.8, (0.25, 4.0));

        for name in ["AcquisitionStart", "AcquisitionStop"] {
            self.add(
                Some(root),
                SimNode::new(name, NodeKind::Command, Access::WriteOnly, NodeValue::None),
            );
        }

        let stream = self.add(
            Some(root),
            SimNode::new("TLStream", NodeKind::Category, Access::ReadOnly, NodeValue::None),
        );
        self.add_enum(
            stream,
            "StreamBufferHandlingMode",
            Access::ReadWrite,
            &[
                ("OldestFirst", 0),
                ("OldestFirstOverwrite", 1),
                ("NewestFirst", 2),
                ("NewestOnly", 3),
            ],
            "OldestFirst",
        );
    }

    fn node(&self, id: NodeId) -> DeviceResult<&SimNode> {
        self.nodes
            .get(id.0)
            .ok_or_else(|| DeviceError::new("GetNode", format!("no node with handle {}", id.0)))
    }

    fn value_by_name(&self, name: &str) -> Option<&NodeValue> {
        self.by_name.get(name).map(|id| &self.nodes[id.0].value)
    }

    fn holds(&self, condition: Condition) -> bool {
        match condition {
            Condition::EnumIs(name, symbolic) => matches!(
                self.value_by_name(name),
                Some(NodeValue::Enumeration(entry)) if entry.symbolic == symbolic
            ),
            Condition::BoolIs(name, expected) => {
                matches!(self.value_by_name(name), Some(NodeValue::Boolean(v)) if *v == expected)
            }
        }
    }

    fn access_mode(&self, id: NodeId) -> DeviceResult<AccessMode> {
        let node = self.node(id)?;
        if !self.initialized || !self.valid {
            return Ok(AccessMode::NotAvailable);
        }
        let mode = match &node.access {
            Access::ReadOnly => AccessMode::ReadOnly,
            Access::ReadWrite => AccessMode::ReadWrite,
            Access::WriteOnly => AccessMode::WriteOnly,
            Access::Idle if self.streaming => AccessMode::ReadOnly,
            Access::Idle => AccessMode::ReadWrite,
            Access::When(conditions) => {
                AccessMode::from_flags(true, conditions.iter().all(|c| self.holds(*c)))
            }
        };
        Ok(mode)
    }

    fn readable(&self, id: NodeId, operation: &str) -> DeviceResult<&SimNode> {
        if !self.access_mode(id)?.is_readable() {
            let node = self.node(id)?;
            return Err(DeviceError::new(operation, format!("node \"{}\" is not readable", node.name)));
        }
        self.node(id)
    }

    fn range(&self, id: NodeId, operation: &str) -> DeviceResult<(f64, f64)> {
        let node = self.readable(id, operation)?;
        node.range
            .ok_or_else(|| DeviceError::new(operation, format!("node \"{}\" has no range", node.name)))
    }

    fn set_value(&mut self, id: NodeId, value: NodeValue) -> DeviceResult<()> {
        if !self.access_mode(id)?.is_writable() {
            let name = &self.node(id)?.name;
            return Err(DeviceError::new("SetValue", format!("node \"{}\" is not writable", name)));
        }
        let node = &mut self.nodes[id.0];
        let coerced = match (node.kind, value) {
            (NodeKind::Float, value) => {
                let v = value.as_f64().ok_or_else(|| type_mismatch(&node.name, "a number"))?;
                check_range(&node.name, node.range, v)?;
                NodeValue::Float(v)
            }
            (NodeKind::Integer, NodeValue::Integer(v)) => {
                check_range(&node.name, node.range, v as f64)?;
                NodeValue::Integer(v)
            }
            (NodeKind::Boolean, NodeValue::Boolean(v)) => NodeValue::Boolean(v),
            (NodeKind::String, NodeValue::String(v)) => NodeValue::String(v),
            (NodeKind::Enumeration, value) => {
                let entry = node
                    .entries
                    .iter()
                    .find(|entry| match &value {
                        NodeValue::Enumeration(requested) => requested.symbolic == entry.symbolic,
                        NodeValue::Integer(v) => *v == entry.value,
                        NodeValue::String(symbolic) => *symbolic == entry.symbolic,
                        _ => false,
                    })
                    .cloned()
                    .ok_or_else(|| {
                        DeviceError::new(
                            "SetValue",
                            format!("\"{}\" is not an entry of \"{}\"", value, node.name),
                        )
                    })?;
                NodeValue::Enumeration(entry)
            }
            (_, _) => return Err(type_mismatch(&node.name, "a value of the node's type")),
        };
        trace!("{} <- {}", node.name, coerced);
        node.value = coerced;
        Ok(())
    }

    fn execute(&mut self, id: NodeId) -> DeviceResult<()> {
        if !self.access_mode(id)?.is_writable() {
            return Err(DeviceError::new("Execute", "command is not available"));
        }
        let node = self.node(id)?;
        if node.kind != NodeKind::Command {
            return Err(DeviceError::new("Execute", format!("\"{}\" is not a command", node.name)));
        }
        match node.name.as_str() {
            "AcquisitionStart" => self.begin_acquisition(),
            "AcquisitionStop" => self.end_acquisition(),
            _ => Ok(()),
        }
    }

    fn init(&mut self) -> DeviceResult<()> {
        if !self.valid {
            return Err(DeviceError::new("Init", "camera is not valid"));
        }
        self.calls.init += 1;
        self.initialized = true;
        debug!("Simulated camera {} initialized", self.serial);
        Ok(())
    }

    fn deinit(&mut self) -> DeviceResult<()> {
        self.calls.deinit += 1;
        if let Some(message) = self.fail_next_deinit.take() {
            return Err(DeviceError::new("DeInit", message));
        }
        if self.streaming {
            return Err(DeviceError::new("DeInit", "camera is still streaming"));
        }
        self.initialized = false;
        Ok(())
    }

    fn begin_acquisition(&mut self) -> DeviceResult<()> {
        if !self.initialized {
            return Err(DeviceError::new("BeginAcquisition", "camera is not initialized"));
        }
        if self.streaming {
            return Err(DeviceError::new("BeginAcquisition", "acquisition already started"));
        }
        self.calls.begin_acquisition += 1;
        self.streaming = true;
        Ok(())
    }

    fn end_acquisition(&mut self) -> DeviceResult<()> {
        self.calls.end_acquisition += 1;
        if let Some(message) = self.fail_next_end_acquisition.take() {
            return Err(DeviceError::new("EndAcquisition", message));
        }
        if !self.streaming {
            return Err(DeviceError::new("EndAcquisition", "acquisition not started"));
        }
        self.streaming = false;
        Ok(())
    }

    fn bits_per_pixel(&self) -> u32 {
        match self.value_by_name("PixelFormat") {
            Some(NodeValue::Enumeration(entry)) if entry.symbolic == "Mono8" => 8,
            _ => 16,
        }
    }

    fn frame_period_ns(&self) -> u64 {
        let fps = self
            .value_by_name("AcquisitionFrameRate")
            .and_then(NodeValue::as_f64)
            .unwrap_or(30.0);
        (1e9 / fps) as u64
    }

    fn brightness(&self) -> f64 {
        let exposure = self
            .value_by_name("ExposureTime")
            .and_then(NodeValue::as_f64)
            .unwrap_or(10_000.0);
        let gain_db = self.value_by_name("Gain").and_then(NodeValue::as_f64).unwrap_or(0.0);
        0.25 * (exposure / 10_000.0) * 10f64.powf(gain_db / 20.0)
    }

    fn generate(&mut self) -> ScriptedFrame {
        self.generated += 1;
        let rows = self.config.height as usize;
        let cols = self.config.width as usize;
        if let Some(every) = self.config.incomplete_every {
            if every > 0 && self.generated % every == 0 {
                return ScriptedFrame::incomplete(rows, cols);
            }
        }

        let max = ((1u32 << self.bits_per_pixel()) - 1) as f64;
        let level = self.brightness() * max;
        let noise = self.config.noise as f64;
        let span = (rows + cols).max(1) as f64;
        let mut rng = rand::thread_rng();
        let pixels = Array2::from_shape_fn((rows, cols), |(r, c)| {
            let gradient = level * (0.5 + (r + c) as f64 / span);
            let jitter = if noise > 0.0 { rng.gen_range(-noise / 2.0..=noise / 2.0) } else { 0.0 };
            (gradient + jitter).clamp(0.0, max) as u16
        });
        ScriptedFrame {
            incomplete: false,
            pixels,
            timestamp: None,
        }
    }
}

fn type_mismatch(node: &str, expected: &str) -> DeviceError {
    DeviceError::new("SetValue", format!("node \"{}\" expects {}", node, expected))
}

fn check_range(node: &str, range: Option<(f64, f64)>, value: f64) -> DeviceResult<()> {
    match range {
        Some((min, max)) if value < min || value > max => Err(DeviceError::new(
            "SetValue",
            format!("{} is out of range [{}, {}] for \"{}\"", value, min, max, node),
        )),
        _ => Ok(()),
    }
}

/// Handle to one simulated camera. Clones refer to the same camera.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    inner: Rc<RefCell<SimCamera>>,
}

impl SimulatedDevice {
    pub fn new(serial: &str, config: SimulationConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SimCamera::new(serial, config))),
        }
    }

    /// Test/control handle sharing this camera's state.
    pub fn probe(&self) -> SimulatedProbe {
        SimulatedProbe {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl NodeMap for SimulatedDevice {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        let camera = self.inner.borrow();
        let parent = camera.nodes.get(parent.0)?;
        let found = parent
            .children
            .iter()
            .copied()
            .find(|id| camera.nodes[id.0].name == name);
        found
    }

    fn access_mode(&self, node: NodeId) -> DeviceResult<AccessMode> {
        self.inner.borrow().access_mode(node)
    }

    fn value(&self, node: NodeId) -> DeviceResult<NodeValue> {
        Ok(self.inner.borrow().readable(node, "GetValue")?.value.clone())
    }

    fn set_value(&mut self, node: NodeId, value: NodeValue) -> DeviceResult<()> {
        self.inner.borrow_mut().set_value(node, value)
    }

    fn min(&self, node: NodeId) -> DeviceResult<NodeValue> {
        let camera = self.inner.borrow();
        let (min, _) = camera.range(node, "GetMin")?;
        Ok(numeric(camera.node(node)?.kind, min))
    }

    fn max(&self, node: NodeId) -> DeviceResult<NodeValue> {
        let camera = self.inner.borrow();
        let (_, max) = camera.range(node, "GetMax")?;
        Ok(numeric(camera.node(node)?.kind, max))
    }

    fn execute(&mut self, node: NodeId) -> DeviceResult<()> {
        self.inner.borrow_mut().execute(node)
    }

    fn enum_entry(&self, namespace: &str, member: &str) -> Option<EnumEntry> {
        let camera = self.inner.borrow();
        let id = camera.by_name.get(namespace)?;
        let node = &camera.nodes[id.0];
        if node.kind != NodeKind::Enumeration {
            return None;
        }
        let entry = node.entries.iter().find(|entry| entry.symbolic == member).cloned();
        entry
    }
}

fn numeric(kind: NodeKind, value: f64) -> NodeValue {
    match kind {
        NodeKind::Integer => NodeValue::Integer(value as i64),
        _ => NodeValue::Float(value),
    }
}

impl Device for SimulatedDevice {
    fn serial(&self) -> String {
        self.inner.borrow().serial.clone()
    }

    fn is_valid(&self) -> bool {
        self.inner.borrow().valid
    }

    fn is_initialized(&self) -> bool {
        let camera = self.inner.borrow();
        camera.valid && camera.initialized
    }

    fn is_streaming(&self) -> bool {
        let camera = self.inner.borrow();
        camera.valid && camera.initialized && camera.streaming
    }

    fn init(&mut self) -> DeviceResult<()> {
        self.inner.borrow_mut().init()
    }

    fn deinit(&mut self) -> DeviceResult<()> {
        self.inner.borrow_mut().deinit()
    }

    fn begin_acquisition(&mut self) -> DeviceResult<()> {
        self.inner.borrow_mut().begin_acquisition()
    }

    fn end_acquisition(&mut self) -> DeviceResult<()> {
        self.inner.borrow_mut().end_acquisition()
    }

    fn next_frame(&mut self) -> DeviceResult<Box<dyn RawFrame>> {
        let mut camera = self.inner.borrow_mut();
        if let Some(message) = camera.fail_next_frame.take() {
            return Err(DeviceError::new("GetNextImage", message));
        }
        if !camera.streaming {
            return Err(DeviceError::new("GetNextImage", "acquisition not started"));
        }
        if camera.outstanding >= BUFFER_POOL_SIZE {
            return Err(DeviceError::new("GetNextImage", "no free buffers, release images first"));
        }

        let scripted = match camera.script.pop_front() {
            Some(frame) => frame,
            None => camera.generate(),
        };
        let period = camera.frame_period_ns();
        camera.clock_ns += period;
        camera.outstanding += 1;
        camera.calls.frames_delivered += 1;

        Ok(Box::new(SimulatedFrame {
            incomplete: scripted.incomplete,
            pixels: scripted.pixels,
            timestamp: scripted.timestamp.unwrap_or(camera.clock_ns),
            bits_per_pixel: camera.bits_per_pixel(),
            released: false,
            camera: Rc::clone(&self.inner),
        }))
    }
}

struct SimulatedFrame {
    incomplete: bool,
    pixels: Array2<u16>,
    timestamp: u64,
    bits_per_pixel: u32,
    released: bool,
    camera: Rc<RefCell<SimCamera>>,
}

impl RawFrame for SimulatedFrame {
    fn is_incomplete(&self) -> bool {
        self.incomplete
    }

    fn pixels(&self) -> DeviceResult<Array2<u16>> {
        if self.released {
            return Err(DeviceError::new("GetNDArray", "image was already released"));
        }
        Ok(self.pixels.clone())
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    fn release(&mut self) -> DeviceResult<()> {
        if self.released {
            return Err(DeviceError::new("Release", "image was already released"));
        }
        self.released = true;
        let mut camera = self.camera.borrow_mut();
        camera.outstanding = camera.outstanding.saturating_sub(1);
        Ok(())
    }
}

/// Shares a simulated camera's state with a test or the demo binary.
#[derive(Debug, Clone)]
pub struct SimulatedProbe {
    inner: Rc<RefCell<SimCamera>>,
}

impl SimulatedProbe {
    pub fn outstanding_frames(&self) -> usize {
        self.inner.borrow().outstanding
    }

    pub fn calls(&self) -> CallCounts {
        self.inner.borrow().calls
    }

    pub fn push_frame(&self, frame: ScriptedFrame) {
        self.inner.borrow_mut().script.push_back(frame);
    }

    pub fn fail_next_frame(&self, message: &str) {
        self.inner.borrow_mut().fail_next_frame = Some(message.to_string());
    }

    /// The next `EndAcquisition` fails and leaves the camera streaming.
    pub fn fail_next_end_acquisition(&self, message: &str) {
        self.inner.borrow_mut().fail_next_end_acquisition = Some(message.to_string());
    }

    /// The next `DeInit` fails and leaves the camera initialized.
    pub fn fail_next_deinit(&self, message: &str) {
        self.inner.borrow_mut().fail_next_deinit = Some(message.to_string());
    }

    pub fn set_valid(&self, valid: bool) {
        self.inner.borrow_mut().valid = valid;
    }

    /// Reads a node by name, ignoring access modes.
    pub fn node_value(&self, name: &str) -> Option<NodeValue> {
        let camera = self.inner.borrow();
        let value = camera.value_by_name(name).cloned();
        value
    }
}

/// A fixed set of simulated cameras.
#[derive(Debug, Default)]
pub struct SimulatedSystem {
    cameras: Vec<SimulatedDevice>,
}

impl SimulatedSystem {
    pub fn new(cameras: Vec<SimulatedDevice>) -> Self {
        Self { cameras }
    }

    pub fn with_camera(serial: &str, config: SimulationConfig) -> Self {
        Self::new(vec![SimulatedDevice::new(serial, config)])
    }
}

impl CameraSystem for SimulatedSystem {
    fn cameras(&mut self) -> DeviceResult<Vec<Box<dyn Device>>> {
        Ok(self
            .cameras
            .iter()
            .map(|camera| Box::new(camera.clone()) as Box<dyn Device>)
            .collect())
    }

    fn is_in_use(&self) -> bool {
        self.cameras.iter().any(|camera| {
            let camera = camera.inner.borrow();
            camera.initialized || camera.outstanding > 0
        })
    }
}
