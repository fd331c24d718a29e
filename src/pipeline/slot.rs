//! Single-slot channel where the newest value replaces any unread one.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

pub fn latest_slot<T>() -> (SlotWriter<T>, SlotReader<T>) {
    let (tx, rx) = bounded(1);
    (
        SlotWriter {
            tx,
            evict: rx.clone(),
        },
        SlotReader { rx },
    )
}

#[derive(Clone)]
pub struct SlotWriter<T> {
    tx: Sender<T>,
    evict: Receiver<T>,
}

impl<T> SlotWriter<T> {
    /// Stores `value`, discarding an unread older one.
    pub fn publish(&self, mut value: T) {
        loop {
            match self.tx.try_send(value) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(back)) => {
                    let _ = self.evict.try_recv();
                    value = back;
                }
            }
        }
    }
}

pub struct SlotReader<T> {
    rx: Receiver<T>,
}

impl<T> SlotReader<T> {
    /// Non-blocking; `None` when nothing new was published since the last call.
    pub fn take_latest(&self) -> Option<T> {
        let mut latest = None;
        while let Ok(value) = self.rx.try_recv() {
            latest = Some(value);
        }
        latest
    }
}
