extern crate tello_teleop;

use std::sync::Arc;

use tokio::time::Duration;

use tello_teleop::{ActionState, DryRunBackend, FlipDirection, TeleopController};

const WAIT: Option<Duration> = Some(Duration::from_secs(5));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let backend = Arc::new(DryRunBackend::new().with_battery(60));
    let drone = TeleopController::new(Arc::clone(&backend));

    drone.takeoff(true, WAIT).await;

    drone.flip(Some(FlipDirection::Left), true, WAIT).await;
    drone.flip(Some(FlipDirection::Right), true, WAIT).await;

    // flips need more than 50% battery
    backend.set_battery(45);
    if drone.flip(Some(FlipDirection::Forward), true, WAIT).await == Some(ActionState::Failed) {
        println!("flip refused at {}% battery", backend.battery());
    }

    drone.land(true, WAIT).await;

    Ok(())
}
