//! Chart-side hover stream.
//!
//! The rendered chart reports the row index under the cursor. Each report is
//! fanned out once to every live [`HoverSubscription`]; a subscription stops
//! receiving as soon as it is dropped, so a replaced session can never feed
//! stale rows into its successor.

use crate::processing::ChartSpec;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use uuid::Uuid;

/// Row index hovered on the chart of a specific session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverEvent {
    pub session: Uuid,
    pub index: usize,
}

/// Receiving end of the hover stream. Dropping it detaches the subscriber.
#[derive(Debug)]
pub struct HoverSubscription {
    receiver: UnboundedReceiver<HoverEvent>,
}

impl HoverSubscription {
    /// Next pending event, if any, without waiting.
    pub fn try_next(&mut self) -> Option<HoverEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[derive(Debug)]
pub struct HoverEmitter {
    session: Uuid,
    subscribers: Vec<UnboundedSender<HoverEvent>>,
}

impl HoverEmitter {
    pub fn new(session: Uuid) -> Self {
        Self {
            session,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> HoverSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        HoverSubscription { receiver }
    }

    /// Deliver one event per live subscriber and return how many received it.
    pub fn emit(&mut self, index: usize) -> usize {
        let event = HoverEvent {
            session: self.session,
            index,
        };
        self.subscribers
            .retain(|subscriber| subscriber.send(event).is_ok());
        self.subscribers.len()
    }

    pub fn detach_all(&mut self) {
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|subscriber| !subscriber.is_closed())
            .count()
    }
}

/// A drawn chart: the series spec plus its hover stream.
#[derive(Debug)]
pub struct TelemetryChart {
    pub spec: ChartSpec,
    pub hover: HoverEmitter,
}

impl TelemetryChart {
    pub fn new(session: Uuid, spec: ChartSpec) -> Self {
        Self {
            spec,
            hover: HoverEmitter::new(session),
        }
    }
}
