use clap::Parser;

/// Captures an averaged frame from a Spinnaker camera and saves it as TIFF.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a TOML config file [default: config/default.toml]
    #[arg(long)]
    pub config: Option<String>,

    /// Serial number of the camera to open
    #[arg(long)]
    pub serial: Option<String>,

    #[arg(long)]
    pub gain: Option<f64>,

    /// Exposure time in microseconds
    #[arg(long)]
    pub exposure: Option<f64>,

    #[arg(long)]
    pub frame_rate: Option<f64>,

    #[arg(long)]
    pub gamma: Option<f64>,

    /// Number of frames to average
    #[arg(long)]
    pub num_to_avg: Option<usize>,

    /// Where to write the averaged TIFF
    #[arg(long)]
    pub output: Option<String>,

    /// Sensor width of the simulated camera
    #[arg(long)]
    pub width: Option<u32>,

    /// Sensor height of the simulated camera
    #[arg(long)]
    pub height: Option<u32>,

    /// Increase log verbosity (-d debug, -dd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[arg(long)]
    pub log_file: Option<String>,

    /// Print the serial numbers of connected cameras and exit
    #[arg(long)]
    pub list: bool,
}

impl CliArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::parse_from(["spincam"]);
        assert_eq!(args.config, None);
        assert_eq!(args.serial, None);
        assert_eq!(args.debug, 0);
        assert!(!args.list);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::parse_from([
            "spincam",
            "--serial",
            "19130526",
            "--gain",
            "2.5",
            "--frame-rate",
            "30",
            "--num-to-avg",
            "4",
            "--output",
            "out/avg.tiff",
            "-dd",
        ]);
        assert_eq!(args.serial.as_deref(), Some("19130526"));
        assert_eq!(args.gain, Some(2.5));
        assert_eq!(args.frame_rate, Some(30.0));
        assert_eq!(args.num_to_avg, Some(4));
        assert_eq!(args.output.as_deref(), Some("out/avg.tiff"));
        assert_eq!(args.debug, 2);
    }
}
