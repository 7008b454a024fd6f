//! In-process datagram link.
//!
//! Behaves like a UDP channel (one send is one receive, oversize datagrams are
//! truncated at the receiver, no acknowledgment) but without the IPv4 size cap.

use std::sync::mpsc::{self, TryRecvError};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{DatagramReceiver, DatagramSender};

/// Create a connected sender/receiver pair.
///
/// `max_datagram` is the largest payload the sender accepts.
pub fn link(name: &str, max_datagram: usize) -> (MemorySender, MemoryReceiver) {
    let (tx, rx) = mpsc::channel();
    (
        MemorySender {
            name: name.to_string(),
            max_datagram,
            tx,
        },
        MemoryReceiver { rx },
    )
}

/// Sending half of an in-memory link.
#[derive(Debug, Clone)]
pub struct MemorySender {
    name: String,
    max_datagram: usize,
    tx: mpsc::Sender<Bytes>,
}

impl DatagramSender for MemorySender {
    fn send(&self, payload: &[u8]) -> Result<usize> {
        if payload.len() > self.max_datagram {
            return Err(TransportError::PayloadTooLarge {
                size: payload.len(),
                max: self.max_datagram,
            });
        }
        // A dropped receiver loses the datagram, same as an unreachable host.
        if self.tx.send(Bytes::copy_from_slice(payload)).is_err() {
            debug!(link = %self.name, "receiver gone; datagram lost");
        }
        Ok(payload.len())
    }

    fn target(&self) -> String {
        format!("memory:{}", self.name)
    }
}

/// Receiving half of an in-memory link.
#[derive(Debug)]
pub struct MemoryReceiver {
    rx: mpsc::Receiver<Bytes>,
}

impl DatagramReceiver for MemoryReceiver {
    fn try_recv(&self, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.rx.try_recv() {
            Ok(datagram) => {
                let len = datagram.len().min(buf.len());
                buf[..len].copy_from_slice(&datagram[..len]);
                Ok(Some(len))
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
}
