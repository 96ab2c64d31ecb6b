use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::protocol::{ClientEvent, ServerEvent};
use crate::session::{ConnectionId, Dispatch, Gateway};

/// Messages from socket tasks to the event loop.
#[derive(Debug)]
pub enum Command {
    Connect {
        outbound: mpsc::UnboundedSender<ServerEvent>,
        reply: oneshot::Sender<ConnectionId>,
    },
    Event {
        from: ConnectionId,
        event: ClientEvent,
    },
    Disconnect {
        from: ConnectionId,
    },
}

/// Cloneable sender side of the event loop, held by every socket task.
#[derive(Debug, Clone)]
pub struct EventLoopHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl EventLoopHandle {
    /// Register a connection and get its identity. `None` once the loop has
    /// stopped.
    pub async fn connect(
        &self,
        outbound: mpsc::UnboundedSender<ServerEvent>,
    ) -> Option<ConnectionId> {
        let (reply, id) = oneshot::channel();
        self.commands.send(Command::Connect { outbound, reply }).ok()?;
        id.await.ok()
    }

    pub fn send_event(&self, from: ConnectionId, event: ClientEvent) {
        if self.commands.send(Command::Event { from, event }).is_err() {
            debug!(connection = %from, "event loop stopped, dropping event");
        }
    }

    pub fn disconnect(&self, from: ConnectionId) {
        if self.commands.send(Command::Disconnect { from }).is_err() {
            debug!(connection = %from, "event loop stopped, dropping disconnect");
        }
    }
}

/// Sole owner of the gateway and therefore of every room.
///
/// Commands are handled one at a time, each to completion, so no room or
/// registry state is ever touched concurrently.
pub struct EventLoop {
    gateway: Gateway,
    outbound: HashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
    next_id: u64,
    commands: mpsc::UnboundedReceiver<Command>,
}

impl EventLoop {
    pub fn new(gateway: Gateway) -> (Self, EventLoopHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_loop = EventLoop {
            gateway,
            outbound: HashMap::new(),
            next_id: 1,
            commands: rx,
        };
        (event_loop, EventLoopHandle { commands: tx })
    }

    /// Runs until every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        info!("event loop stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Connect { outbound, reply } => {
                let id = ConnectionId::new(self.next_id);
                self.next_id += 1;
                self.outbound.insert(id, outbound);
                info!(connection = %id, "connection opened");
                if reply.send(id).is_err() {
                    // Socket went away before learning its id.
                    let dispatches = self.gateway.disconnect(id);
                    self.outbound.remove(&id);
                    self.deliver(dispatches);
                }
            }
            Command::Event { from, event } => {
                debug!(connection = %from, ?event, "event received");
                let dispatches = self.gateway.handle(from, event);
                self.deliver(dispatches);
            }
            Command::Disconnect { from } => {
                self.outbound.remove(&from);
                let dispatches = self.gateway.disconnect(from);
                self.deliver(dispatches);
            }
        }
    }

    fn deliver(&self, dispatches: Vec<Dispatch>) {
        for Dispatch { to, event } in dispatches {
            match self.outbound.get(&to) {
                Some(sender) => {
                    if sender.send(event).is_err() {
                        debug!(connection = %to, "outbound channel closed, dropping event");
                    }
                }
                None => debug!(connection = %to, "no outbound channel, dropping event"),
            }
        }
    }
}

/// Start the event loop on the current runtime.
pub fn spawn(gateway: Gateway) -> EventLoopHandle {
    let (event_loop, handle) = EventLoop::new(gateway);
    tokio::spawn(event_loop.run());
    handle
}
