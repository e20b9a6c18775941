use tokio::sync::watch;
use tokio::time::{timeout, Duration};

/// Progress of a command the drone is carrying out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Started,
    Succeeded,
    Failed,
}

impl ActionState {
    pub fn is_finished(&self) -> bool {
        !matches!(self, ActionState::Started)
    }
}

/// Completion handle returned by a backend command.
///
/// Waiting is always bounded: an action that outlives the wait is still in
/// flight on the drone, the caller just stops watching it.
#[derive(Debug)]
pub struct Action {
    rx: watch::Receiver<ActionState>,
}

/// Resolving end of an [`Action`], held by the backend.
///
/// Dropping it without resolving marks the action failed.
#[derive(Debug)]
pub struct ActionCompleter {
    tx: watch::Sender<ActionState>,
}

impl Action {
    pub fn pending() -> (Action, ActionCompleter) {
        let (tx, rx) = watch::channel(ActionState::Started);
        (Action { rx }, ActionCompleter { tx })
    }

    pub fn succeeded() -> Self {
        Self::resolved(ActionState::Succeeded)
    }

    pub fn failed() -> Self {
        Self::resolved(ActionState::Failed)
    }

    fn resolved(state: ActionState) -> Self {
        let (_tx, rx) = watch::channel(state);
        Action { rx }
    }

    /// Current state, without waiting.
    pub fn state(&self) -> ActionState {
        let state = *self.rx.borrow();
        if state == ActionState::Started && self.rx.has_changed().is_err() {
            // completer went away without an answer
            ActionState::Failed
        } else {
            state
        }
    }

    /// Waits until the action finishes or `limit` elapses, whichever comes
    /// first, and returns the state seen at that point.
    pub async fn wait_for_completed(&mut self, limit: Duration) -> ActionState {
        let outcome = timeout(limit, self.rx.wait_for(|s| s.is_finished()))
            .await
            .map(|r| r.map(|s| *s));

        match outcome {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => ActionState::Failed,
            Err(_elapsed) => self.state(),
        }
    }
}

impl ActionCompleter {
    pub fn succeed(self) {
        self.tx.send_replace(ActionState::Succeeded);
    }

    pub fn fail(self) {
        self.tx.send_replace(ActionState::Failed);
    }
}
