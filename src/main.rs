use spincam::{
    camera::{CameraConfig, SpinCam},
    cli::CliArgs,
    config::Config,
    device::SimulatedSystem,
    logging, output,
};

use anyhow::{Context, Result};
use log::info;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    // Parse command-line arguments
    let cli_args = CliArgs::parse_args();

    // Setup logging
    spincam::initialize(cli_args.debug, cli_args.log_file.as_deref())?;

    // Load configuration
    let config = Config::load(&cli_args)?;
    logging::log_app_config(&config);

    let system = SimulatedSystem::with_camera("SIM-0001", config.simulation.clone());
    let mut cam = SpinCam::new(system);

    if cli_args.list {
        for serial in cam.list_cameras().context("Failed to enumerate cameras")? {
            println!("{}", serial);
        }
        return Ok(());
    }

    run(&mut cam, &config)?;

    // Dropping the camera runs the remaining teardown
    drop(cam);
    info!("Done");
    Ok(())
}

fn run(cam: &mut SpinCam<SimulatedSystem>, config: &Config) -> Result<()> {
    let camera: &CameraConfig = &config.camera;

    cam.find_cam(camera.serial.as_deref()).context("Failed to find camera")?;
    cam.init_cam().context("Failed to initialize camera")?;

    cam.apply_config(camera).context("Failed to configure camera")?;
    cam.set_stream_buffer_handling(config.acquisition.buffer_handling)
        .context("Failed to set stream buffer handling mode")?;
    cam.set_acquisition_mode(config.acquisition.acquisition_mode)
        .context("Failed to set acquisition mode")?;

    let (rows, cols) = cam.frame_shape().context("Failed to read frame shape")?;
    info!("Frame shape: {} rows x {} columns", rows, cols);

    cam.start_acquisition().context("Failed to start acquisition")?;
    thread::sleep(Duration::from_millis(config.acquisition.settle_ms));

    let averaged = cam
        .get_image_and_avg(config.acquisition.num_to_avg)
        .context("Failed to capture averaged image")?;
    output::save_tiff(&config.output.path, &averaged)
        .with_context(|| format!("Failed to save image to {}", config.output.path))?;

    cam.end_acquisition().context("Failed to end acquisition")?;
    Ok(())
}
