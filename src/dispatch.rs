use std::future::Future;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use log::debug;
use tokio::runtime::Handle;

use crate::api::{ApiError, TaskClient};
use crate::model::{CreateTaskInput, Task};

/// Identifies one dispatched request so its response can be matched to the screen that asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn new(n: u64) -> Self {
        Self(n)
    }
}

#[derive(Debug)]
pub enum Outcome {
    Tasks(Result<Vec<Task>, ApiError>),
    Task(Result<Option<Task>, ApiError>),
    Created(Result<Task, ApiError>),
}

#[derive(Debug)]
pub struct Response {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// The three calls a screen can ask for. Each returns the ticket its response will carry.
pub trait TaskRequests {
    fn fetch_all(&mut self) -> Ticket;
    fn fetch_one(&mut self, id: &str) -> Ticket;
    fn create(&mut self, input: CreateTaskInput) -> Ticket;
}

/// Issues API calls on the runtime and returns their results over a channel.
pub struct Dispatcher {
    handle: Handle,
    client: Arc<TaskClient>,
    tx: Sender<Response>,
    next: u64,
}

impl Dispatcher {
    /// The receiver must be kept alive for responses to be delivered.
    pub fn new(handle: Handle, client: TaskClient) -> (Self, Receiver<Response>) {
        let (tx, rx) = mpsc::channel();
        let dispatcher = Self {
            handle,
            client: Arc::new(client),
            tx,
            next: 0,
        };
        (dispatcher, rx)
    }

    fn ticket(&mut self) -> Ticket {
        self.next += 1;
        Ticket::new(self.next)
    }

    fn spawn<F>(&mut self, call: F) -> Ticket
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let ticket = self.ticket();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let outcome = call.await;
            // Receiver dropped means the UI is gone
            let _ = tx.send(Response { ticket, outcome });
        });
        debug!("dispatched request {ticket:?}");
        ticket
    }
}

impl TaskRequests for Dispatcher {
    fn fetch_all(&mut self) -> Ticket {
        let client = Arc::clone(&self.client);
        self.spawn(async move { Outcome::Tasks(client.list().await) })
    }

    fn fetch_one(&mut self, id: &str) -> Ticket {
        let client = Arc::clone(&self.client);
        let id = id.to_string();
        self.spawn(async move { Outcome::Task(client.get(&id).await) })
    }

    fn create(&mut self, input: CreateTaskInput) -> Ticket {
        let client = Arc::clone(&self.client);
        self.spawn(async move { Outcome::Created(client.create(&input).await) })
    }
}

/// Returns the next delivered response without blocking.
pub fn try_next(rx: &Receiver<Response>) -> Option<Response> {
    rx.try_recv().ok()
}
