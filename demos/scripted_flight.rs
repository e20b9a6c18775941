extern crate tello_teleop;

use std::sync::Arc;

use tokio::time::Duration;

use tello_teleop::{Direction, DryRunBackend, TeleopController};

const WAIT: Option<Duration> = Some(Duration::from_secs(10));

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let backend = Arc::new(DryRunBackend::new().with_action_delay(Duration::from_millis(200)));
    let drone = TeleopController::new(Arc::clone(&backend));

    drone.takeoff(true, WAIT).await;

    // default step
    drone.fly(Some(Direction::Up), None, true, WAIT).await;
    drone.fly(Some(Direction::Down), None, true, WAIT).await;

    // go away slowly
    drone.set_speed(Some(25));
    drone.set_step(300);
    drone.fly(Some(Direction::Forward), None, true, WAIT).await;

    drone.rotate(180, true, WAIT).await;

    // come back fast
    drone.set_speed(Some(100));
    drone.fly(Some(Direction::Forward), Some(300), true, WAIT).await;

    drone.rotate(-180, true, WAIT).await;
    drone.land(true, WAIT).await;

    for command in backend.history() {
        println!("{command}");
    }

    Ok(())
}
