//////////////////////////////////////////////////////////////////////////////
//
// Keyboard teleoperation against the dry-run backend
//
//  Controls:
//  - Arrow keys: fly forward/back/left/right by 20cm
//  - 1 / 2: step +/- 20cm
//  - 3 / 4: speed +/- 10cm/s
//  - Esc: end the session (the drone then lands)
//
// Run with RUST_LOG=info to see the commands the drone would receive.
//
//////////////////////////////////////////////////////////////////////////////

extern crate tello_teleop;

use std::sync::Arc;

use tokio::time::Duration;

use tello_teleop::{DryRunBackend, InputDispatcher, TeleopController, TeleopOptions, TerminalKeys};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let backend = Arc::new(DryRunBackend::new().with_action_delay(Duration::from_millis(500)));
    let controller = Arc::new(TeleopController::new(backend));

    controller.takeoff(true, Some(Duration::from_secs(10))).await;

    let options = TeleopOptions::default();
    println!("{}", options.help());

    let (keys, listener) = TerminalKeys::spawn()?;
    let mut dispatcher = InputDispatcher::new(Arc::clone(&controller), listener, options);
    dispatcher.run().await?;
    keys.stop();
    keys.join().await;

    controller.land(true, Some(Duration::from_secs(10))).await;

    Ok(())
}
