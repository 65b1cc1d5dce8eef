mod reader;
mod types;

pub use reader::{capture_averaged, capture_one};
pub use types::{AveragedFrame, Frame, Image};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::simulated::{ScriptedFrame, SimulatedDevice, SimulationConfig};
    use crate::device::{Device, SimulatedProbe};
    use crate::error::CameraError;
    use ndarray::Array2;

    fn streaming() -> (SimulatedDevice, SimulatedProbe) {
        let mut device = SimulatedDevice::new(
            "FRAMES",
            SimulationConfig {
                width: 4,
                height: 3,
                ..SimulationConfig::default()
            },
        );
        device.init().unwrap();
        device.begin_acquisition().unwrap();
        let probe = device.probe();
        (device, probe)
    }

    #[test]
    fn test_capture_one_complete() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 9, 1234));

        let frame = capture_one(&mut device).unwrap().unwrap();

        assert_eq!(frame.data, Array2::from_elem((3, 4), 9u16));
        assert_eq!(frame.timestamp, 1234);
        assert_eq!(frame.bits_per_pixel, 16);
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_capture_one_incomplete_is_dropped_and_released() {
        let (mut device, probe) = streaming();
        let baseline = probe.outstanding_frames();
        probe.push_frame(ScriptedFrame::incomplete(3, 4));

        assert!(capture_one(&mut device).unwrap().is_none());
        assert_eq!(probe.outstanding_frames(), baseline);
        assert_eq!(probe.calls().frames_delivered, 1);
    }

    #[test]
    fn test_capture_averaged_mean_and_last_timestamp() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 2, 100));
        probe.push_frame(ScriptedFrame::filled(3, 4, 4, 200));
        probe.push_frame(ScriptedFrame::filled(3, 4, 6, 300));

        let averaged = capture_averaged(&mut device, 3).unwrap();

        assert_eq!(averaged.data, Array2::from_elem((3, 4), 4.0f32));
        assert_eq!(averaged.timestamp, 300);
        assert_eq!(probe.outstanding_frames(), 0);
    }

    fn incomplete_at(timestamp: u64) -> ScriptedFrame {
        ScriptedFrame {
            timestamp: Some(timestamp),
            ..ScriptedFrame::incomplete(3, 4)
        }
    }

    #[test]
    fn test_capture_averaged_divides_by_requested_count() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 10, 100));
        probe.push_frame(incomplete_at(200));

        let averaged = capture_averaged(&mut device, 2).unwrap();

        assert_eq!(averaged.data, Array2::from_elem((3, 4), 5.0f32));
        assert_eq!(averaged.timestamp, 200);
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_capture_averaged_skips_incomplete() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 10, 100));
        probe.push_frame(incomplete_at(200));
        probe.push_frame(ScriptedFrame::filled(3, 4, 30, 300));
        probe.push_frame(incomplete_at(400));

        let averaged = capture_averaged(&mut device, 4).unwrap();

        assert_eq!(averaged.data, Array2::from_elem((3, 4), 10.0f32));
        assert_eq!(averaged.timestamp, 400);
        assert_eq!(averaged.bits_per_pixel, 16);
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_capture_averaged_all_incomplete() {
        let (mut device, probe) = streaming();
        for _ in 0..3 {
            probe.push_frame(ScriptedFrame::incomplete(3, 4));
        }

        let err = capture_averaged(&mut device, 3).unwrap_err();

        assert!(matches!(err, CameraError::NoValidFrames { requested: 3 }));
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_capture_averaged_zero_frames() {
        let (mut device, _probe) = streaming();
        assert!(matches!(
            capture_averaged(&mut device, 0),
            Err(CameraError::InvalidFrameCount(0))
        ));
    }

    #[test]
    fn test_device_error_aborts_batch() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 1, 100));
        probe.fail_next_frame("transfer timeout");

        let err = capture_averaged(&mut device, 3).unwrap_err();

        assert!(matches!(err, CameraError::Device(_)));
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_shape_change_aborts_and_releases() {
        let (mut device, probe) = streaming();
        probe.push_frame(ScriptedFrame::filled(3, 4, 1, 100));
        probe.push_frame(ScriptedFrame::filled(2, 2, 1, 200));

        let err = capture_averaged(&mut device, 2).unwrap_err();

        assert!(matches!(
            err,
            CameraError::FrameShape {
                expected: (3, 4),
                actual: (2, 2)
            }
        ));
        assert_eq!(probe.outstanding_frames(), 0);
    }

    #[test]
    fn test_generated_frames_average_to_frame_shape() {
        let (mut device, _probe) = streaming();
        let averaged = capture_averaged(&mut device, 5).unwrap();
        assert_eq!(averaged.shape(), (3, 4));
    }
}
