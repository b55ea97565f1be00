//! Live commentary session.
//!
//! Lines pushed through [`CommentarySink`] land on an unbounded channel that
//! the host drains and broadcasts to connected clients. Nothing here waits on
//! a reply.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::CommentarySink;

#[derive(Debug, Default)]
pub struct LiveCommentary {
    tx: Option<mpsc::UnboundedSender<String>>,
}

impl LiveCommentary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, replacing any previous one
    pub fn connect(&mut self) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);
        info!("live commentary connected");
        rx
    }

    pub fn disconnect(&mut self) {
        if self.tx.take().is_some() {
            info!("live commentary disconnected");
        }
    }
}

impl CommentarySink for LiveCommentary {
    fn is_live(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    fn send_event(&mut self, text: &str) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(text.to_string()).is_err() {
            warn!("live commentary receiver dropped");
            self.tx = None;
        }
    }
}
