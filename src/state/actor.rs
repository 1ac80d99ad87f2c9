use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::utils::clock::Clock;

use super::{
    StateError,
    document::{AppDocument, EntryKind, JournalEntry, Mode, Task, TaskToggle},
    store::DocumentStore,
};

/// A document mutation or query, paired with its reply envelope.
pub enum StateCommand {
    AddTask {
        text: String,
        reply: oneshot::Sender<Result<Task, StateError>>,
    },
    ToggleTask {
        id: i64,
        reply: oneshot::Sender<Result<TaskToggle, StateError>>,
    },
    DeleteTask {
        id: i64,
        reply: oneshot::Sender<Result<(), StateError>>,
    },
    LogEntry {
        kind: EntryKind,
        entry: JournalEntry,
        reply: oneshot::Sender<Result<i64, StateError>>,
    },
    AdjustPoints {
        delta: i64,
        reply: oneshot::Sender<Result<i64, StateError>>,
    },
    SetGoal {
        text: String,
        completed: bool,
        reply: oneshot::Sender<Result<(), StateError>>,
    },
    SetMode {
        mode: Mode,
        reply: oneshot::Sender<Result<Mode, StateError>>,
    },
    Replace {
        document: Box<AppDocument>,
        reply: oneshot::Sender<Result<(), StateError>>,
    },
    Snapshot {
        reply: oneshot::Sender<AppDocument>,
    },
}

/// Owns the document and serializes every mutation. There is exactly one authoritative
/// `focus_points` counter, the one in the document; the tracker and the API both go through
/// this actor, so neither can clobber the other's writes. Each mutation is persisted before
/// the caller receives its reply.
pub struct DocumentActor {
    receiver: mpsc::Receiver<StateCommand>,
    document: AppDocument,
    store: DocumentStore,
    clock: Box<dyn Clock>,
}

impl DocumentActor {
    pub async fn load(
        store: DocumentStore,
        receiver: mpsc::Receiver<StateCommand>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, StateError> {
        let document = store.load_or_init().await?;
        Ok(Self {
            receiver,
            document,
            store,
            clock,
        })
    }

    pub fn focus_points(&self) -> i64 {
        self.document.focus_points
    }

    /// Runs until every [StateHandle] is dropped.
    pub async fn run(mut self) -> Result<(), StateError> {
        info!("State actor running");
        while let Some(command) = self.receiver.recv().await {
            self.handle(command).await;
        }
        self.receiver.close();
        info!("State actor finished");
        Ok(())
    }

    async fn handle(&mut self, command: StateCommand) {
        match command {
            StateCommand::AddTask { text, reply } => {
                let now = self.clock.time();
                let result = self.document.add_task(&text, now);
                let _ = reply.send(self.persisted(result).await);
            }
            StateCommand::ToggleTask { id, reply } => {
                let result = self.document.toggle_task(id);
                let _ = reply.send(self.persisted(result).await);
            }
            StateCommand::DeleteTask { id, reply } => {
                self.document.delete_task(id);
                let _ = reply.send(self.persisted(Ok(())).await);
            }
            StateCommand::LogEntry { kind, entry, reply } => {
                let now = self.clock.time();
                let points = self.document.log_entry(kind, entry, now);
                let _ = reply.send(self.persisted(Ok(points)).await);
            }
            StateCommand::AdjustPoints { delta, reply } => {
                let total = self.document.adjust_points(delta);
                debug!("Points adjusted by {delta} to {total}");
                let _ = reply.send(self.persisted(Ok(total)).await);
            }
            StateCommand::SetGoal {
                text,
                completed,
                reply,
            } => {
                self.document.set_goal(text, completed);
                let _ = reply.send(self.persisted(Ok(())).await);
            }
            StateCommand::SetMode { mode, reply } => {
                self.document.set_mode(mode);
                let _ = reply.send(self.persisted(Ok(mode)).await);
            }
            StateCommand::Replace { document, reply } => {
                self.document = *document;
                let _ = reply.send(self.persisted(Ok(())).await);
            }
            StateCommand::Snapshot { reply } => {
                let _ = reply.send(self.document.clone());
            }
        }
    }

    /// Persists after a successful mutation. A failed mutation skips the write, a failed write
    /// turns the reply into an error while the in-memory document stays authoritative.
    async fn persisted<T>(&mut self, result: Result<T, StateError>) -> Result<T, StateError> {
        let value = result?;
        self.store
            .persist(&self.document)
            .await
            .inspect_err(|e| error!("Failed to persist document {e:?}"))?;
        Ok(value)
    }
}

/// Cloneable async façade over the actor's command channel.
#[derive(Clone)]
pub struct StateHandle {
    sender: mpsc::Sender<StateCommand>,
}

impl StateHandle {
    pub fn new(sender: mpsc::Sender<StateCommand>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        command: StateCommand,
        receiver: oneshot::Receiver<Result<T, StateError>>,
    ) -> Result<T, StateError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| StateError::ServiceClosed)?;
        receiver.await.map_err(|_| StateError::ServiceClosed)?
    }

    pub async fn add_task(&self, text: String) -> Result<Task, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::AddTask { text, reply }, receiver)
            .await
    }

    pub async fn toggle_task(&self, id: i64) -> Result<TaskToggle, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::ToggleTask { id, reply }, receiver)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::DeleteTask { id, reply }, receiver)
            .await
    }

    pub async fn log_entry(&self, kind: EntryKind, entry: JournalEntry) -> Result<i64, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::LogEntry { kind, entry, reply }, receiver)
            .await
    }

    pub async fn adjust_points(&self, delta: i64) -> Result<i64, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::AdjustPoints { delta, reply }, receiver)
            .await
    }

    pub async fn set_goal(&self, text: String, completed: bool) -> Result<(), StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(
            StateCommand::SetGoal {
                text,
                completed,
                reply,
            },
            receiver,
        )
        .await
    }

    pub async fn set_mode(&self, mode: Mode) -> Result<Mode, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(StateCommand::SetMode { mode, reply }, receiver)
            .await
    }

    pub async fn replace(&self, document: AppDocument) -> Result<(), StateError> {
        let (reply, receiver) = oneshot::channel();
        self.request(
            StateCommand::Replace {
                document: Box::new(document),
                reply,
            },
            receiver,
        )
        .await
    }

    pub async fn snapshot(&self) -> Result<AppDocument, StateError> {
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(StateCommand::Snapshot { reply })
            .await
            .map_err(|_| StateError::ServiceClosed)?;
        receiver.await.map_err(|_| StateError::ServiceClosed)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;
    use tempfile::{TempDir, tempdir};
    use tokio::{sync::mpsc, task::JoinHandle};

    use crate::{
        state::{
            StateError,
            document::{EntryKind, Mode},
            store::DocumentStore,
        },
        utils::clock::DefaultClock,
    };

    use super::{DocumentActor, StateHandle};

    async fn spawn_actor(dir: &TempDir) -> Result<(StateHandle, JoinHandle<()>)> {
        let store = DocumentStore::new(dir.path().join("app_data.json"));
        let (sender, receiver) = mpsc::channel(8);
        let actor = DocumentActor::load(store, receiver, Box::new(DefaultClock)).await?;
        let join = tokio::spawn(async move {
            actor.run().await.unwrap();
        });
        Ok((StateHandle::new(sender), join))
    }

    #[tokio::test]
    async fn task_lifecycle_through_the_actor() -> Result<()> {
        let dir = tempdir()?;
        let (handle, join) = spawn_actor(&dir).await?;

        let task = handle.add_task("buy milk".into()).await?;
        assert_eq!(task.id, 0);

        let toggled = handle.toggle_task(task.id).await?;
        assert!(toggled.completed);
        assert_eq!(toggled.focus_points, 10);

        handle.delete_task(task.id).await?;
        // Deleting an id that no longer exists stays a success.
        handle.delete_task(task.id).await?;

        let snapshot = handle.snapshot().await?;
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.focus_points, 10);

        drop(handle);
        join.await?;
        Ok(())
    }

    #[tokio::test]
    async fn validation_and_not_found_pass_through() -> Result<()> {
        let dir = tempdir()?;
        let (handle, join) = spawn_actor(&dir).await?;

        assert!(matches!(
            handle.add_task(String::new()).await,
            Err(StateError::Validation(_))
        ));
        assert!(matches!(
            handle.toggle_task(3).await,
            Err(StateError::NotFound(_))
        ));

        drop(handle);
        join.await?;
        Ok(())
    }

    #[tokio::test]
    async fn mutations_survive_a_restart() -> Result<()> {
        let dir = tempdir()?;
        let (handle, join) = spawn_actor(&dir).await?;

        handle.adjust_points(-3).await?;
        handle.set_mode(Mode::Chill).await?;
        handle
            .log_entry(
                EntryKind::Sentiment,
                json!({"mood": "calm"}).as_object().unwrap().clone(),
            )
            .await?;
        let before = handle.snapshot().await?;
        drop(handle);
        join.await?;

        // A second actor over the same directory sees the same document.
        let (handle, join) = spawn_actor(&dir).await?;
        let after = handle.snapshot().await?;
        assert_eq!(before, after);
        assert_eq!(after.focus_points, 12);
        assert_eq!(after.current_mode, Mode::Chill);

        drop(handle);
        join.await?;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_writers_lose_no_updates() -> Result<()> {
        let dir = tempdir()?;
        let (handle, join) = spawn_actor(&dir).await?;

        let adders = (0..10)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.adjust_points(1).await })
            })
            .collect::<Vec<_>>();
        for adder in adders {
            adder.await??;
        }

        assert_eq!(handle.snapshot().await?.focus_points, 10);

        drop(handle);
        join.await?;
        Ok(())
    }
}
