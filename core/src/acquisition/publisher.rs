use crate::frame::LiveFrame;
use std::sync::Arc;
use tokio::sync::watch;

/// Single-slot, last-value-wins handoff of the latest frame. The acquisition
/// cycle overwrites unconditionally; no history is retained and a slow
/// reader only ever observes the newest frame.
pub struct FramePublisher {
    sender: watch::Sender<Arc<LiveFrame>>,
}

/// Read side of the handoff, paced entirely by the consumer.
#[derive(Clone)]
pub struct FrameSubscriber {
    receiver: watch::Receiver<Arc<LiveFrame>>,
}

impl FramePublisher {
    pub fn new(initial: LiveFrame) -> (Self, FrameSubscriber) {
        let (sender, receiver) = watch::channel(Arc::new(initial));
        (Self { sender }, FrameSubscriber { receiver })
    }

    pub fn publish(&self, frame: LiveFrame) {
        self.sender.send_replace(Arc::new(frame));
    }
}

impl FrameSubscriber {
    pub fn latest(&self) -> Arc<LiveFrame> {
        self.receiver.borrow().clone()
    }
}
