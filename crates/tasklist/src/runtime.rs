//! Running controller effects against a [`Remote`].

use crate::client::Remote;
use crate::controller::{Controller, Effect, Outcome};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Make the call an effect describes.
pub async fn execute(remote: &dyn Remote, effect: Effect) -> Outcome {
    let result = remote.call(&effect.request).await;
    effect.complete(result)
}

/// Run `effect` and every follow-up call it triggers, one after another,
/// folding each reply into `controller`.
pub async fn drive(controller: &mut Controller, remote: &dyn Remote, effect: Option<Effect>) {
    let mut queue: VecDeque<Effect> = effect.into_iter().collect();
    while let Some(effect) = queue.pop_front() {
        let outcome = execute(remote, effect).await;
        queue.extend(controller.apply(outcome));
    }
}

/// Run `effect` on its own task and deliver the outcome on `tx`, so the caller
/// keeps handling input while the call is in flight.
pub fn spawn(
    remote: Arc<dyn Remote>,
    effect: Effect,
    tx: mpsc::UnboundedSender<Outcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = execute(remote.as_ref(), effect).await;
        if tx.send(outcome).is_err() {
            debug!("outcome receiver closed; dropping reply");
        }
    })
}
