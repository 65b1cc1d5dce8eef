//! Named camera controls and the typed helpers built on the dispatcher.

use std::fmt;
use std::str::FromStr;

use log::info;
use serde::Deserialize;

use super::SpinCam;
use crate::device::{AccessMode, CameraSystem, NodeValue};
use crate::dispatch::{self, Argument, Method, NodePath};
use crate::error::{CameraResult, DeviceError};
use crate::gate;

/// Nodes the helpers touch, by GenICam feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    DeviceSerialNumber,
    Width,
    Height,
    PixelFormat,
    Gain,
    GainAuto,
    ExposureTime,
    ExposureAuto,
    AcquisitionFrameRate,
    AcquisitionFrameRateEnabled,
    AcquisitionFrameRateAuto,
    AcquisitionMode,
    Gamma,
    VideoMode,
    StreamBufferHandlingMode,
}

impl Control {
    pub fn path(self) -> &'static str {
        match self {
            Control::DeviceSerialNumber => "DeviceSerialNumber",
            Control::Width => "Width",
            Control::Height => "Height",
            Control::PixelFormat => "PixelFormat",
            Control::Gain => "Gain",
            Control::GainAuto => "GainAuto",
            Control::ExposureTime => "ExposureTime",
            Control::ExposureAuto => "ExposureAuto",
            Control::AcquisitionFrameRate => "AcquisitionFrameRate",
            Control::AcquisitionFrameRateEnabled => "AcquisitionFrameRateEnabled",
            Control::AcquisitionFrameRateAuto => "AcquisitionFrameRateAuto",
            Control::AcquisitionMode => "AcquisitionMode",
            Control::Gamma => "Gamma",
            Control::VideoMode => "VideoMode",
            Control::StreamBufferHandlingMode => "TLStream.StreamBufferHandlingMode",
        }
    }

    /// Node name without its category prefix; also the enumeration namespace.
    pub fn name(self) -> &'static str {
        let path = self.path();
        path.rsplit('.').next().unwrap_or(path)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An enumeration-typed control with a fixed set of entries.
pub trait EnumControl: Copy {
    const CONTROL: Control;

    fn symbolic(self) -> &'static str;

    fn argument(self) -> Argument {
        Argument::Symbol {
            namespace: Self::CONTROL.name().to_string(),
            member: self.symbolic().to_string(),
        }
    }
}

macro_rules! enum_control {
    ($(#[$meta:meta])* $name:ident => $control:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl EnumControl for $name {
            const CONTROL: Control = Control::$control;

            fn symbolic(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err(format!("\"{}\" is not a valid {}", other, stringify!($name))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.symbolic())
            }
        }
    };
}

enum_control!(ExposureAuto => ExposureAuto { Off, Once, Continuous });
enum_control!(GainAuto => GainAuto { Off, Once, Continuous });
enum_control!(AcquisitionFrameRateAuto => AcquisitionFrameRateAuto { Off, Continuous });
enum_control!(AcquisitionMode => AcquisitionMode { Continuous, SingleFrame, MultiFrame });
enum_control!(PixelFormat => PixelFormat { Mono8, Mono16 });
enum_control!(
    /// How the stream hands buffers to the host when it falls behind.
    StreamBufferHandlingMode => StreamBufferHandlingMode {
        OldestFirst,
        OldestFirstOverwrite,
        NewestFirst,
        NewestOnly,
    }
);
enum_control!(
    /// Sensor readout mode (binning/ROI presets on FLIR cameras).
    VideoMode => VideoMode { Mode0, Mode1, Mode2, Mode3, Mode4, Mode5, Mode6, Mode7 }
);

fn expect_f64(control: Control, value: NodeValue) -> CameraResult<f64> {
    value.as_f64().ok_or_else(|| {
        DeviceError::new(control.path(), format!("expected a number, got \"{}\"", value)).into()
    })
}

fn expect_i64(control: Control, value: NodeValue) -> CameraResult<i64> {
    value.as_i64().ok_or_else(|| {
        DeviceError::new(control.path(), format!("expected an integer, got \"{}\"", value)).into()
    })
}

impl<S: CameraSystem> SpinCam<S> {
    /// Runs a node method on a named control. The control's node handle is
    /// resolved once per device and reused afterwards.
    pub fn node_cmd(
        &mut self,
        control: Control,
        method: Method,
        expected: Option<AccessMode>,
        argument: Option<Argument>,
    ) -> CameraResult<NodeValue> {
        let (device, cache) = self.registry.current_with_cache()?;
        gate::assert_initialized(&*device)?;
        let path = NodePath::parse(control.path())?;
        let node = match cache.get(&control) {
            Some(node) => *node,
            None => {
                let node = dispatch::resolve(&*device, &path)?;
                cache.insert(control, node);
                node
            }
        };
        dispatch::invoke_node(device, &path, node, method, expected, argument)
    }

    fn set_rw(&mut self, control: Control, argument: Argument) -> CameraResult<()> {
        self.node_cmd(control, Method::SetValue, Some(AccessMode::ReadWrite), Some(argument))?;
        Ok(())
    }

    pub fn set_enum<E: EnumControl>(&mut self, value: E) -> CameraResult<()> {
        self.set_rw(E::CONTROL, value.argument())
    }

    fn read_f64(&mut self, control: Control, method: Method) -> CameraResult<f64> {
        let value = self.node_cmd(control, method, None, None)?;
        expect_f64(control, value)
    }

    pub fn set_gain(&mut self, gain: f64) -> CameraResult<()> {
        self.set_rw(Control::Gain, gain.into())
    }

    pub fn set_exposure(&mut self, exposure: f64) -> CameraResult<()> {
        self.set_rw(Control::ExposureTime, exposure.into())
    }

    pub fn set_frame_rate(&mut self, frame_rate: f64) -> CameraResult<()> {
        self.set_rw(Control::AcquisitionFrameRate, frame_rate.into())
    }

    pub fn set_gamma(&mut self, gamma: f64) -> CameraResult<()> {
        info!("Setting Gamma to {}", gamma);
        self.set_rw(Control::Gamma, gamma.into())
    }

    pub fn set_video_mode(&mut self, mode: VideoMode) -> CameraResult<()> {
        self.set_enum(mode)?;
        info!("Video Mode set to {}", mode);
        Ok(())
    }

    pub fn set_stream_buffer_handling(&mut self, mode: StreamBufferHandlingMode) -> CameraResult<()> {
        self.set_enum(mode)
    }

    pub fn set_acquisition_mode(&mut self, mode: AcquisitionMode) -> CameraResult<()> {
        self.set_enum(mode)
    }

    pub fn set_pixel_format(&mut self, format: PixelFormat) -> CameraResult<()> {
        self.set_enum(format)
    }

    pub fn disable_auto_exposure(&mut self) -> CameraResult<()> {
        info!("Disabling Auto Exposure");
        self.set_enum(ExposureAuto::Off)
    }

    pub fn disable_auto_gain(&mut self) -> CameraResult<()> {
        info!("Disabling Auto Gain");
        self.set_enum(GainAuto::Off)
    }

    /// Enables manual frame rate control, then switches the auto mode off.
    pub fn disable_auto_frame_rate(&mut self) -> CameraResult<()> {
        self.set_rw(Control::AcquisitionFrameRateEnabled, true.into())?;
        info!("Enabling frame rate control");
        self.set_enum(AcquisitionFrameRateAuto::Off)
    }

    pub fn gain(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::Gain, Method::GetValue)
    }

    pub fn exposure(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::ExposureTime, Method::GetValue)
    }

    pub fn exposure_min(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::ExposureTime, Method::GetMin)
    }

    pub fn exposure_max(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::ExposureTime, Method::GetMax)
    }

    pub fn frame_rate(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::AcquisitionFrameRate, Method::GetValue)
    }

    pub fn frame_rate_min(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::AcquisitionFrameRate, Method::GetMin)
    }

    pub fn frame_rate_max(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::AcquisitionFrameRate, Method::GetMax)
    }

    pub fn gamma(&mut self) -> CameraResult<f64> {
        self.read_f64(Control::Gamma, Method::GetValue)
    }

    /// Frame size as (rows, columns).
    pub fn frame_shape(&mut self) -> CameraResult<(usize, usize)> {
        let height = self.node_cmd(Control::Height, Method::GetValue, None, None)?;
        let width = self.node_cmd(Control::Width, Method::GetValue, None, None)?;
        let height = expect_i64(Control::Height, height)?;
        let width = expect_i64(Control::Width, width)?;
        Ok((height.max(0) as usize, width.max(0) as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_control_name() {
        assert_eq!(Control::StreamBufferHandlingMode.path(), "TLStream.StreamBufferHandlingMode");
        assert_eq!(Control::StreamBufferHandlingMode.name(), "StreamBufferHandlingMode");
        assert_eq!(Control::Gain.name(), "Gain");
    }

    #[test]
    fn test_enum_control_argument() {
        assert_eq!(
            ExposureAuto::Off.argument(),
            Argument::Symbol {
                namespace: "ExposureAuto".to_string(),
                member: "Off".to_string()
            }
        );
        assert_eq!(StreamBufferHandlingMode::NewestOnly.to_string(), "NewestOnly");
    }

    #[test]
    fn test_enum_control_parse() {
        assert_eq!("Mode7".parse::<VideoMode>().unwrap(), VideoMode::Mode7);
        assert!("Mode8".parse::<VideoMode>().is_err());
    }
}
