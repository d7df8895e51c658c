// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Decoupled download requests.
//!
//! Parts of the program that do not own the gallery state (keyboard
//! shortcuts, the FAQ, future menu items) hold a [`SignalEmitter`] and ask
//! for a download through it. The app drains the [`SignalBus`] once per
//! frame and handles each signal exactly like the matching button.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

/// Requests that can be raised from outside the gallery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DownloadSignal {
    /// Same as pressing "Download All".
    All,
}

/// Receiving end, owned by the app.
pub struct SignalBus {
    tx: Sender<DownloadSignal>,
    rx: Receiver<DownloadSignal>,
}

/// Cloneable sending end.
#[derive(Clone)]
pub struct SignalEmitter {
    tx: Sender<DownloadSignal>,
}

impl Default for SignalBus {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl SignalBus {
    pub fn emitter(&self) -> SignalEmitter {
        SignalEmitter {
            tx: self.tx.clone(),
        }
    }

    /// Take every signal raised since the last call, in order.
    pub fn drain(&self) -> Vec<DownloadSignal> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(signal) => out.push(signal),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl SignalEmitter {
    /// Ask the app to download the whole catalog.
    pub fn request_download_all(&self) {
        // The bus owns a sender too, so the channel cannot be disconnected while it lives.
        if self.tx.send(DownloadSignal::All).is_err() {
            log::debug!("Download signal dropped: bus is gone");
        }
    }
}
