use crate::Error;
use std::{
    future::Future,
    sync::mpsc::{channel, Receiver, Sender},
    thread::spawn,
};
use tokio::runtime::Runtime;

/// Runs futures on dedicated tokio runtimes, each on its own thread.
#[derive(Debug)]
pub struct Executor {
    sender: Sender<Result<(), Error>>,
    receiver: Receiver<Result<(), Error>>,
}

impl Executor {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub fn spawn_runtime<F, State>(&mut self, state: State, f: impl FnOnce(State) -> F + 'static + Send)
    where
        F: Future<Output = Result<(), Error>>,
        State: 'static + Send + Sync,
    {
        let sender = self.sender.clone();
        spawn(move || {
            let result = match Runtime::new() {
                Ok(runtime) => spawn(move || runtime.block_on(f(state)))
                    .join()
                    .unwrap_or_else(|_| Err(Error::new("Runtime thread panicked"))),
                Err(error) => Err(Error::from(error).context("Could not start runtime")),
            };
            #[allow(unused_must_use)]
            {
                sender.send(result);
            };
        });
    }

    /// Waits for every spawned runtime, returns the first error.
    pub fn join(self) -> Result<(), Error> {
        drop(self.sender);
        let mut result = Ok(());
        while let Ok(outcome) = self.receiver.recv() {
            if result.is_ok() {
                result = outcome;
            }
        }
        result
    }
}
