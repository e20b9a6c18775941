use std::sync::Arc;

use tokio::sync::watch;
use tokio::{spawn, task};

use crate::backend::FlightBackend;
use crate::command::Direction;
use crate::controller::TeleopController;
use crate::errors::{Result, TeleopError};
use crate::keys::{Key, KeyReceiver};
use crate::options::TeleopOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Cancel,
}

/// Applies one key press to `controller`.
///
/// Arrow keys fly the fixed teleoperation step, whatever the controller's
/// own step is. Keys `1`/`2` change the step and `3`/`4` the speed, through
/// the controller's validated setters, when enabled. Flights are sent
/// without waiting for the drone.
pub async fn handle_key<B: FlightBackend>(
    controller: &TeleopController<B>,
    options: &TeleopOptions,
    key: Key,
) -> KeyOutcome {
    if key == options.cancel_key {
        return KeyOutcome::Cancel;
    }

    let direction = match key {
        Key::Up => Some(Direction::Forward),
        Key::Down => Some(Direction::Back),
        Key::Left => Some(Direction::Left),
        Key::Right => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = direction {
        controller
            .fly(Some(direction), Some(options.teleop_step), true, None)
            .await;
        return KeyOutcome::Continue;
    }

    match key {
        Key::Char('1') if options.adjust_keys => {
            controller.set_step(controller.step().saturating_add(options.step_increment));
            log::info!("[Teleop] step {}", controller.step());
        }
        Key::Char('2') if options.adjust_keys => {
            controller.set_step(controller.step().saturating_sub(options.step_increment));
            log::info!("[Teleop] step {}", controller.step());
        }
        Key::Char('3') if options.adjust_keys => {
            let speed =
                controller.set_speed(Some(controller.speed().saturating_add(options.speed_increment)));
            log::info!("[Teleop] speed {speed}");
        }
        Key::Char('4') if options.adjust_keys => {
            let speed = controller
                .set_speed(Some(controller.speed().saturating_sub(options.speed_increment)));
            log::info!("[Teleop] speed {speed}");
        }
        other => log::debug!("[Teleop] ignoring key {other}"),
    }
    KeyOutcome::Continue
}

/// Marks its session finished however the session task ends. A later
/// session is left alone.
struct ActiveGuard {
    active: Arc<watch::Sender<Option<u64>>>,
    session: u64,
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.active.send_if_modified(|active| {
            if *active == Some(self.session) {
                *active = None;
                true
            } else {
                false
            }
        });
    }
}

/// Keyboard teleoperation session.
///
/// Idle until [`start`](Self::start), which hands the key listener to a
/// background task and goes active. The session goes back to idle when the
/// cancel key arrives, the key source closes, or [`stop`](Self::stop) is
/// called. A listener serves one session only: give it a fresh one with
/// [`replace_listener`](Self::replace_listener) before starting again.
#[derive(Debug)]
pub struct InputDispatcher<B> {
    controller: Arc<TeleopController<B>>,
    options: TeleopOptions,
    listener: Option<KeyReceiver>,
    active: Arc<watch::Sender<Option<u64>>>,
    sessions: u64,
    task: Option<task::JoinHandle<()>>,
}

impl<B: FlightBackend> InputDispatcher<B> {
    pub fn new(
        controller: Arc<TeleopController<B>>,
        listener: KeyReceiver,
        options: TeleopOptions,
    ) -> Self {
        let (active, _) = watch::channel(None);
        Self {
            controller,
            options,
            listener: Some(listener),
            active: Arc::new(active),
            sessions: 0,
            task: None,
        }
    }

    pub fn controller(&self) -> &Arc<TeleopController<B>> {
        &self.controller
    }

    pub fn options(&self) -> &TeleopOptions {
        &self.options
    }

    pub fn is_active(&self) -> bool {
        self.active.borrow().is_some()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn replace_listener(&mut self, listener: KeyReceiver) {
        self.listener = Some(listener);
    }

    pub fn start(&mut self) -> Result<()> {
        if self.is_active() {
            return Err(TeleopError::AlreadyActive);
        }
        let mut keys = self.listener.take().ok_or(TeleopError::ListenerConsumed)?;

        let controller = Arc::clone(&self.controller);
        let options = self.options.clone();
        self.sessions += 1;
        self.active.send_replace(Some(self.sessions));
        let guard = ActiveGuard {
            active: Arc::clone(&self.active),
            session: self.sessions,
        };

        log::info!("[Teleop] START LISTENING: {}", options.help());
        self.task = Some(spawn(async move {
            let _guard = guard;
            loop {
                let Some(key) = keys.recv().await else {
                    log::info!("[Teleop] key source closed");
                    break;
                };
                if handle_key(&controller, &options, key).await == KeyOutcome::Cancel {
                    log::info!("[Teleop] end");
                    break;
                }
            }
            log::info!("[Teleop] STOP LISTENING");
        }));

        Ok(())
    }

    /// Ends the session from outside. Does nothing when idle.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.active.send_replace(None);
    }

    /// Waits, without spinning, until the session is idle again.
    pub async fn wait_until_idle(&mut self) {
        let mut active = self.active.subscribe();
        let _ = active.wait_for(|active| active.is_none()).await;

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    log::error!("[Teleop] session task panicked");
                }
            }
        }
    }

    /// Starts a session and waits for it to end.
    pub async fn run(&mut self) -> Result<()> {
        self.start()?;
        self.wait_until_idle().await;
        Ok(())
    }
}

impl<B> Drop for InputDispatcher<B> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FlightCommand;
    use crate::dry_run::DryRunBackend;
    use crate::keys::make_key_channel;

    fn controller() -> TeleopController<DryRunBackend> {
        TeleopController::new(Arc::new(DryRunBackend::new()))
    }

    #[tokio::test]
    async fn arrows_fly_the_fixed_step() {
        let c = controller();
        let options = TeleopOptions::default();
        assert_eq!(c.step(), 100);

        assert_eq!(handle_key(&c, &options, Key::Up).await, KeyOutcome::Continue);
        handle_key(&c, &options, Key::Right).await;
        assert_eq!(
            c.backend().history(),
            vec![
                FlightCommand::Fly { direction: Direction::Forward, distance: 20 },
                FlightCommand::Fly { direction: Direction::Right, distance: 20 },
            ]
        );
    }

    #[tokio::test]
    async fn number_keys_adjust_step_and_speed() {
        let c = controller();
        let options = TeleopOptions::default();

        handle_key(&c, &options, Key::Char('1')).await;
        assert_eq!(c.step(), 120);
        handle_key(&c, &options, Key::Char('2')).await;
        handle_key(&c, &options, Key::Char('2')).await;
        assert_eq!(c.step(), 80);

        handle_key(&c, &options, Key::Char('3')).await;
        assert_eq!(c.speed(), 20);
        handle_key(&c, &options, Key::Char('4')).await;
        handle_key(&c, &options, Key::Char('4')).await;
        assert_eq!(c.speed(), 10);
        assert_eq!(
            c.backend().history(),
            vec![FlightCommand::Speed(20), FlightCommand::Speed(10)]
        );
    }

    #[tokio::test]
    async fn adjust_keys_can_be_disabled() {
        let c = controller();
        let options = TeleopOptions::default().with_adjust_keys(false);
        handle_key(&c, &options, Key::Char('1')).await;
        handle_key(&c, &options, Key::Char('3')).await;
        assert_eq!(c.step(), 100);
        assert_eq!(c.speed(), 10);
    }

    #[tokio::test]
    async fn step_never_leaves_its_range() {
        let c = controller();
        let options = TeleopOptions::default();
        c.set_step(20);
        handle_key(&c, &options, Key::Char('2')).await;
        assert_eq!(c.step(), 20);
        c.set_step(500);
        handle_key(&c, &options, Key::Char('1')).await;
        assert_eq!(c.step(), 500);
    }

    #[tokio::test]
    async fn huge_increments_are_ignored() {
        let c = controller();
        let options = TeleopOptions::default()
            .with_step_increment(u32::MAX)
            .with_speed_increment(u32::MAX);

        assert_eq!(handle_key(&c, &options, Key::Char('1')).await, KeyOutcome::Continue);
        assert_eq!(handle_key(&c, &options, Key::Char('3')).await, KeyOutcome::Continue);
        assert_eq!(c.step(), 100);
        assert_eq!(c.speed(), 10);
        assert!(c.backend().history().is_empty());
    }

    #[tokio::test]
    async fn session_survives_huge_increment() {
        let (tx, rx) = make_key_channel();
        let options = TeleopOptions::default().with_speed_increment(u32::MAX);
        let mut dispatcher = InputDispatcher::new(Arc::new(controller()), rx, options);

        dispatcher.start().unwrap();
        tx.send(Key::Char('3')).unwrap();
        tx.send(Key::Up).unwrap();
        tx.send(Key::Esc).unwrap();
        dispatcher.wait_until_idle().await;

        assert_eq!(
            dispatcher.controller().backend().history(),
            vec![FlightCommand::Fly { direction: Direction::Forward, distance: 20 }]
        );
    }

    #[tokio::test]
    async fn unknown_and_cancel_keys() {
        let c = controller();
        let options = TeleopOptions::default();
        assert_eq!(handle_key(&c, &options, Key::Char('x')).await, KeyOutcome::Continue);
        assert_eq!(handle_key(&c, &options, Key::Esc).await, KeyOutcome::Cancel);
        assert!(c.backend().history().is_empty());
    }

    #[tokio::test]
    async fn cancel_key_ends_the_session() {
        let (tx, rx) = make_key_channel();
        let mut dispatcher =
            InputDispatcher::new(Arc::new(controller()), rx, TeleopOptions::default());
        assert!(!dispatcher.is_active());

        dispatcher.start().unwrap();
        assert!(dispatcher.is_active());
        assert!(!dispatcher.has_listener());

        tx.send(Key::Left).unwrap();
        tx.send(Key::Esc).unwrap();
        dispatcher.wait_until_idle().await;

        assert!(!dispatcher.is_active());
        assert_eq!(
            dispatcher.controller().backend().history(),
            vec![FlightCommand::Fly { direction: Direction::Left, distance: 20 }]
        );
        // the listener is gone, so further keys go nowhere
        assert!(tx.send(Key::Esc).is_err());
    }

    #[tokio::test]
    async fn stop_is_harmless_when_idle() {
        let (_tx, rx) = make_key_channel();
        let mut dispatcher =
            InputDispatcher::new(Arc::new(controller()), rx, TeleopOptions::default());
        dispatcher.stop();
        assert!(!dispatcher.is_active());
        assert!(dispatcher.has_listener());
        dispatcher.wait_until_idle().await;
    }
}
