//! Async timer session.
//!
//! A single tokio task owns the [`TimerEngine`]. User events and scheduler
//! wake-ups share one channel into that task, so commands are applied one at
//! a time against the only copy of the state. Effects come back out on a
//! second channel; sound effects are also played on the session's
//! [`SoundPlayer`].
//!
//! The task ends after `NavigateBack` or `SequenceCompleted`, on
//! [`SessionHandle::dispose`], or when every handle is dropped. In all three
//! cases pending callbacks are cancelled and the player is released.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::error::Result;
use crate::events::{Effect, Event};
use crate::plan::ExerciseConfig;
use crate::scheduler::{TokioSubstrate, Wakeup, WakeupSink};
use crate::sound::SoundPlayer;
use crate::timer::{EngineSettings, Snapshot, TimerEngine};

enum Input {
    Event(Event),
    Wakeup(Wakeup),
    Snapshot(oneshot::Sender<Snapshot>),
    Dispose(oneshot::Sender<()>),
}

/// Caller side of a running session.
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Input>,
    task: JoinHandle<()>,
}

/// Start a session task on the current tokio runtime.
///
/// Returns the handle and the stream of effects.
///
/// # Errors
///
/// Fails for a plan without segments, or when called outside a runtime.
pub fn spawn<P>(
    config: &ExerciseConfig,
    settings: EngineSettings,
    clock: Arc<dyn Clock>,
    player: P,
) -> Result<(SessionHandle, mpsc::UnboundedReceiver<Effect>)>
where
    P: SoundPlayer + 'static,
{
    let substrate = TokioSubstrate::current()?;
    let (tx, rx) = mpsc::unbounded_channel();
    let (effects_tx, effects_rx) = mpsc::unbounded_channel();

    // Weak, so dropping every handle still closes the channel.
    let weak = tx.downgrade();
    let sink: WakeupSink = Arc::new(move |wakeup| {
        if let Some(tx) = weak.upgrade() {
            let _ = tx.send(Input::Wakeup(wakeup));
        }
    });

    let engine = TimerEngine::new(config, settings, clock, substrate, sink)?;
    let task = tokio::spawn(run(engine, player, rx, effects_tx));
    Ok((SessionHandle { tx, task }, effects_rx))
}

impl SessionHandle {
    /// Queue an event. Returns `false` once the session has ended.
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(Input::Event(event)).is_ok()
    }

    /// Current state view, or `None` once the session has ended.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Input::Snapshot(reply)).ok()?;
        rx.await.ok()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel all pending callbacks, release audio and wait for the task.
    pub async fn dispose(self) {
        let (ack, done) = oneshot::channel();
        if self.tx.send(Input::Dispose(ack)).is_ok() {
            let _ = done.await;
        }
        let _ = self.task.await;
    }

    /// Wait until the session ends on its own.
    pub async fn finished(self) {
        let _ = self.task.await;
    }
}

async fn run<P: SoundPlayer>(
    mut engine: TimerEngine<TokioSubstrate>,
    mut player: P,
    mut rx: mpsc::UnboundedReceiver<Input>,
    effects_tx: mpsc::UnboundedSender<Effect>,
) {
    while let Some(input) = rx.recv().await {
        let effects = match input {
            Input::Event(event) => engine.handle(event),
            Input::Wakeup(wakeup) => engine.handle_wakeup(wakeup),
            Input::Snapshot(reply) => {
                let _ = reply.send(engine.snapshot());
                continue;
            }
            Input::Dispose(ack) => {
                shutdown(&mut engine, &mut player);
                let _ = ack.send(());
                return;
            }
        };

        let terminal = effects.iter().any(Effect::is_terminal);
        for effect in effects {
            match &effect {
                Effect::PlaySound { effect } => player.play(*effect),
                Effect::Announce { text } => player.announce(text),
                _ => {}
            }
            // The caller may have stopped listening; the session keeps going.
            let _ = effects_tx.send(effect);
        }

        if terminal {
            debug!("session reached a terminal effect");
            shutdown(&mut engine, &mut player);
            return;
        }
    }

    shutdown(&mut engine, &mut player);
}

fn shutdown<P: SoundPlayer>(engine: &mut TimerEngine<TokioSubstrate>, player: &mut P) {
    if engine.is_disposed() {
        return;
    }
    engine.dispose();
    player.release();
    info!("session stopped");
}
