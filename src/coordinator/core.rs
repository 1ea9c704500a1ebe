//! The coordinator: a single serialized event loop driving every actor's
//! lifecycle.

// Layer 1: Standard library imports
use std::future::Future;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

// Layer 3: Internal module imports
use super::command::Command;
use super::config::CoordinatorConfig;
use super::errors::CoordinatorError;
use crate::actor::{Actor, ActorRegistry};
use crate::dependency::DependencyManager;
use crate::status::StatusManager;
use crate::subscription::{Subscription, SubscriptionRegistry};
use crate::transition::{Action, ActionResult, TransitionAction, TransitionManager};
use crate::util::{ActorKey, Status};

/// Handle to the lifecycle coordinator.
///
/// The coordinator drives a population of named actors through a declared
/// lineage of status transitions, honoring per-actor transition actions,
/// cross-actor transition dependencies, and one-shot subscription
/// observers. All operations enqueue work onto a single-consumer command
/// mailbox; the event loop task that drains it is the only code that
/// touches subsystem state, so no locks are involved.
///
/// The handle is cheaply cloneable; clones address the same event loop.
///
/// # Example
///
/// ```rust,ignore
/// use stagehand::{Coordinator, MailboxActor};
///
/// let coordinator = Coordinator::new();
/// let worker = MailboxActor::spawn("container", "worker-1");
///
/// coordinator.add_actor(worker.clone(), "NONE", "STOPPED").await;
/// coordinator
///     .add_transition_action(worker.as_ref(), "NONE", "READY", || async { Ok(()) })
///     .await?;
/// coordinator.update_status(worker.as_ref(), "READY").await?;
/// ```
#[derive(Clone)]
pub struct Coordinator {
    commands: mpsc::Sender<Command>,
}

impl Coordinator {
    /// Start a coordinator with the default configuration.
    ///
    /// Must be called from within a tokio runtime; the event loop task
    /// starts immediately.
    pub fn new() -> Self {
        Self::start(CoordinatorConfig::default().mailbox_capacity)
    }

    /// Start a coordinator with a custom configuration.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::ConfigError`] if the configuration fails
    /// [`CoordinatorConfig::validate`].
    pub fn with_config(config: CoordinatorConfig) -> Result<Self, CoordinatorError> {
        config.validate().map_err(CoordinatorError::ConfigError)?;
        Ok(Self::start(config.mailbox_capacity))
    }

    /// Spawn the event loop over a command mailbox of validated capacity.
    fn start(capacity: usize) -> Self {
        let (commands, inbox) = mpsc::channel(capacity);
        let core = CoordinatorCore::new(commands.clone());
        tokio::spawn(core.run(inbox));

        Self { commands }
    }

    /// Register an actor with its initial and terminal statuses.
    ///
    /// The actor's desired and known statuses both start at `initial`.
    /// Registering the same key twice is not supported.
    pub async fn add_actor(
        &self,
        actor: Arc<dyn Actor>,
        initial: impl Into<Status>,
        terminal: impl Into<Status>,
    ) {
        let _ = self
            .commands
            .send(Command::AddActor {
                actor,
                initial: initial.into(),
                terminal: terminal.into(),
            })
            .await;
    }

    /// Record that `src` cannot begin transitioning to `src_status` until
    /// `dep` has reached `dep_status`.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::UnknownActor`] if either actor is unregistered;
    /// [`CoordinatorError::CycleDetected`] if the edge would close a cycle
    /// (the prerequisite set is left as it was before the call).
    pub async fn add_transition_dependency<S, D>(
        &self,
        src: &S,
        src_status: impl Into<Status>,
        dep: &D,
        dep_status: impl Into<Status>,
    ) -> Result<(), CoordinatorError>
    where
        S: Actor + ?Sized,
        D: Actor + ?Sized,
    {
        self.request(|reply| Command::AddTransitionDependency {
            src: src.key(),
            src_status: src_status.into(),
            dep: dep.key(),
            dep_status: dep_status.into(),
            reply,
        })
        .await
    }

    /// Register an action to run whenever `actor` transitions from `src`
    /// to `dest`. Multiple actions for the same edge all run, and the
    /// transition succeeds only if every one of them does.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::IllegalTransition`] if the edge is a self-loop,
    /// leaves the terminal status, or enters the initial status.
    pub async fn add_transition_action<A, F, Fut>(
        &self,
        actor: &A,
        src: impl Into<Status>,
        dest: impl Into<Status>,
        action: F,
    ) -> Result<(), CoordinatorError>
    where
        A: Actor + ?Sized,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.send_transition_action(actor.key(), src.into(), dest.into(), Action::new(action))
            .await
    }

    /// Register a batch of transition actions; stops at the first error.
    pub async fn add_transition_actions<A>(
        &self,
        actor: &A,
        actions: Vec<TransitionAction>,
    ) -> Result<(), CoordinatorError>
    where
        A: Actor + ?Sized,
    {
        for entry in actions {
            self.send_transition_action(actor.key(), entry.src_status, entry.dest_status, entry.action)
                .await?;
        }
        Ok(())
    }

    /// Steer an actor toward `desired`.
    ///
    /// Returns as soon as the request is accepted; the transition itself
    /// runs asynchronously once all of its dependencies are satisfied.
    /// Requesting the current desired or known status is an idempotent
    /// no-op, and requests made while a transition is in flight are
    /// deferred until it settles.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::UnknownActor`] for unregistered actors;
    /// [`CoordinatorError::IllegalTransition`] if no action was registered
    /// for the edge or the edge is structurally illegal.
    pub async fn update_status<A>(
        &self,
        actor: &A,
        desired: impl Into<Status>,
    ) -> Result<(), CoordinatorError>
    where
        A: Actor + ?Sized,
    {
        let key = actor.key();
        let desired = desired.into();
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::UpdateStatus {
                key,
                desired,
                reply: Some(reply),
            })
            .await
            .map_err(|_| CoordinatorError::Unavailable)?;
        response.await.map_err(|_| CoordinatorError::Unavailable)?
    }

    /// Read an actor's current known status.
    ///
    /// Unregistered actors report [`Status::unknown`].
    pub async fn get_status<A>(&self, actor: &A) -> Status
    where
        A: Actor + ?Sized,
    {
        let (reply, response) = oneshot::channel();
        let sent = self
            .commands
            .send(Command::GetStatus {
                key: actor.key(),
                reply,
            })
            .await;
        if sent.is_err() {
            return Status::unknown();
        }
        response.await.unwrap_or_else(|_| Status::unknown())
    }

    /// Register a one-shot observer invoked after `actor` reaches
    /// `status`. Observers run on the actor's task and must not rely on
    /// [`get_status`](Self::get_status) already reflecting the new status.
    ///
    /// # Errors
    ///
    /// [`CoordinatorError::IllegalSubscription`] when subscribing to the
    /// initial or already-reached status.
    pub async fn subscribe<A, F>(
        &self,
        actor: &A,
        status: impl Into<Status>,
        observer: F,
    ) -> Result<(), CoordinatorError>
    where
        A: Actor + ?Sized,
        F: FnOnce() + Send + Sync + 'static,
    {
        self.request(|reply| Command::Subscribe {
            key: actor.key(),
            status: status.into(),
            observer: Box::new(observer),
            reply,
        })
        .await
    }

    /// Stop the event loop.
    ///
    /// In-flight transitions are abandoned and subsequent operations fail
    /// with [`CoordinatorError::Unavailable`].
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    async fn send_transition_action(
        &self,
        key: ActorKey,
        src: Status,
        dest: Status,
        action: Action,
    ) -> Result<(), CoordinatorError> {
        self.request(|reply| Command::AddTransitionAction {
            key,
            src,
            dest,
            action,
            reply,
        })
        .await
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<(), CoordinatorError>>) -> Command,
    ) -> Result<(), CoordinatorError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| CoordinatorError::Unavailable)?;
        response.await.map_err(|_| CoordinatorError::Unavailable)?
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// State owned by the event-loop task: the four subsystems plus a sender
/// for re-entrant enqueues (deferred updates, dependent wakeups, action
/// completions).
struct CoordinatorCore {
    commands: mpsc::Sender<Command>,
    registry: ActorRegistry,
    statuses: StatusManager,
    transitions: TransitionManager,
    dependencies: DependencyManager,
    subscriptions: SubscriptionRegistry,
}

impl CoordinatorCore {
    fn new(commands: mpsc::Sender<Command>) -> Self {
        Self {
            commands,
            registry: ActorRegistry::new(),
            statuses: StatusManager::new(),
            transitions: TransitionManager::new(),
            dependencies: DependencyManager::new(),
            subscriptions: SubscriptionRegistry::new(),
        }
    }

    async fn run(mut self, mut inbox: mpsc::Receiver<Command>) {
        while let Some(command) = inbox.recv().await {
            if !self.handle(command).await {
                break;
            }
        }
    }

    async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::AddActor {
                actor,
                initial,
                terminal,
            } => {
                let key = self.registry.register(actor);
                debug!(actor = %key, %initial, %terminal, "registered actor");
                self.statuses.initialize_actor(key, initial, terminal);
            }
            Command::AddTransitionDependency {
                src,
                src_status,
                dep,
                dep_status,
                reply,
            } => {
                let _ = reply.send(self.add_transition_dependency(src, src_status, dep, dep_status));
            }
            Command::AddTransitionAction {
                key,
                src,
                dest,
                action,
                reply,
            } => {
                let _ = reply.send(self.add_transition_action(key, src, dest, action));
            }
            Command::UpdateStatus {
                key,
                desired,
                reply,
            } => {
                let result = self.update_status(key, desired).await;
                match reply {
                    Some(reply) => {
                        let _ = reply.send(result);
                    }
                    None => {
                        if let Err(error) = result {
                            debug!(%error, "deferred status update failed");
                        }
                    }
                }
            }
            Command::GetStatus { key, reply } => {
                let status = if self.registry.is_registered(&key) {
                    self.statuses.known_status(&key)
                } else {
                    Status::unknown()
                };
                let _ = reply.send(status);
            }
            Command::Subscribe {
                key,
                status,
                observer,
                reply,
            } => {
                let _ = reply.send(self.subscribe(key, status, observer));
            }
            Command::PerformTransition { key } => self.perform_transition(&key).await,
            Command::CompleteAction { key, result } => self.complete_action(&key, result).await,
            Command::Shutdown => {
                debug!("coordinator shutting down");
                return false;
            }
        }
        true
    }

    fn add_transition_dependency(
        &mut self,
        src: ActorKey,
        src_status: Status,
        dep: ActorKey,
        dep_status: Status,
    ) -> Result<(), CoordinatorError> {
        if !self.registry.is_registered(&src) {
            return Err(CoordinatorError::UnknownActor(src));
        }
        if !self.registry.is_registered(&dep) {
            return Err(CoordinatorError::UnknownActor(dep));
        }
        self.dependencies
            .add_transition_dependency(src, src_status, dep, dep_status)?;
        Ok(())
    }

    fn add_transition_action(
        &mut self,
        key: ActorKey,
        src: Status,
        dest: Status,
        action: Action,
    ) -> Result<(), CoordinatorError> {
        if !self.statuses.is_valid_transition_status(&key, &src, &dest) {
            return Err(CoordinatorError::IllegalTransition { key, src, dest });
        }
        debug!(actor = %key, %src, %dest, "adding transition action");
        self.transitions.add_transition_action(key, src, dest, action);
        Ok(())
    }

    fn subscribe(
        &mut self,
        key: ActorKey,
        status: Status,
        observer: Subscription,
    ) -> Result<(), CoordinatorError> {
        if !self.statuses.is_valid_subscription_status(&key, &status) {
            return Err(CoordinatorError::IllegalSubscription { key, status });
        }
        self.subscriptions.subscribe(key, status, observer);
        Ok(())
    }

    async fn update_status(
        &mut self,
        key: ActorKey,
        desired: Status,
    ) -> Result<(), CoordinatorError> {
        if !self.registry.is_registered(&key) {
            return Err(CoordinatorError::UnknownActor(key));
        }

        let current_desired = self.statuses.desired_status(&key);
        if current_desired == desired {
            debug!(actor = %key, status = %desired, "desired status already set, skipping update");
            return Ok(());
        }
        let current_known = self.statuses.known_status(&key);
        if current_known == desired {
            debug!(actor = %key, status = %desired, "known status already set, skipping update");
            return Ok(());
        }

        // A transition is in flight; revisit once it settles. The reposted
        // command observes the settled statuses and either proceeds or
        // defers again.
        if current_desired != current_known {
            debug!(
                actor = %key,
                from = %current_known,
                to = %current_desired,
                "transition in flight, deferring update"
            );
            self.enqueue(Command::UpdateStatus {
                key,
                desired,
                reply: None,
            })
            .await;
            return Ok(());
        }

        if !self.transitions.is_valid_transition(&key, &current_desired, &desired)
            || !self
                .statuses
                .is_valid_transition_status(&key, &current_desired, &desired)
        {
            return Err(CoordinatorError::IllegalTransition {
                key,
                src: current_desired,
                dest: desired,
            });
        }

        debug!(actor = %key, status = %desired, "setting desired status");
        self.statuses.set_desired_status(&key, desired);
        self.enqueue(Command::PerformTransition { key }).await;
        Ok(())
    }

    async fn perform_transition(&mut self, key: &ActorKey) {
        let desired = self.statuses.desired_status(key);
        if self.dependencies.has_transition_dependencies(key, &desired) {
            debug!(actor = %key, status = %desired, "transition blocked on dependencies");
            return;
        }

        let Some(actor) = self.registry.get(key) else {
            debug!(actor = %key, "no registered actor for transition");
            return;
        };
        let actor = Arc::clone(actor);

        let known = self.statuses.known_status(key);
        // Spurious wakeups from satisfied dependencies: either nothing is
        // pending or the actions are already dispatched.
        if known == desired || self.transitions.has_open_transition(key) {
            return;
        }

        debug!(actor = %key, from = %known, to = %desired, "starting transition");
        let actions = self.transitions.start_transition(key, &known, &desired);
        for action in actions {
            let commands = self.commands.clone();
            let key = key.clone();
            actor
                .notify(Box::pin(async move {
                    let result = action.call().await;
                    let _ = commands.send(Command::CompleteAction { key, result }).await;
                }))
                .await;
        }
    }

    async fn complete_action(&mut self, key: &ActorKey, result: ActionResult) {
        let Some(results) = self.transitions.complete_transition_action(key, result) else {
            return;
        };

        let mut new_status = self.statuses.desired_status(key);
        for result in &results {
            if let Err(error) = result {
                debug!(actor = %key, %error, "transition action failed, diverting to terminal status");
                new_status = self.statuses.terminal_status(key);
                self.statuses.set_desired_status(key, new_status.clone());
                break;
            }
        }

        self.update_known_status(key, new_status).await;
    }

    async fn update_known_status(&mut self, key: &ActorKey, new_status: Status) {
        // Observers are handed to the actor mailbox before the status is
        // published; they execute asynchronously on the actor task.
        let observers = self.subscriptions.drain(key, &new_status);
        if let Some(actor) = self.registry.get(key) {
            let actor = Arc::clone(actor);
            for observer in observers {
                actor.notify(Box::pin(async move { observer() })).await;
            }
        }

        debug!(actor = %key, status = %new_status, "setting known status");
        self.statuses.set_known_status(key, new_status.clone());

        for dependent in self.dependencies.notify_dependencies_of_status(key, &new_status) {
            debug!(actor = %key, %dependent, "waking dependent");
            self.enqueue(Command::PerformTransition { key: dependent }).await;
        }

        if new_status == self.statuses.terminal_status(key) {
            if let Some(actor) = self.registry.get(key) {
                debug!(actor = %key, "terminal status reached, stopping actor");
                actor.stop().await;
            }
        }
    }

    async fn enqueue(&self, command: Command) {
        let _ = self.commands.send(command).await;
    }
}
