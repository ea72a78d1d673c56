//! Session store: the single live identity and its startup lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mireceta_core::config::SessionSettings;
use mireceta_core::storage::{JsonStorageExt, KeyValueStorage};
use mireceta_core::user::User;
use mireceta_core::{ReadySignal, Subscribers, SubscriptionId};
use tokio::task::JoinHandle;

/// Holds the current user, persists it and reports when startup has finished
/// reading the stored identity.
///
/// The store starts uninitialized. [`SessionStore::initialize`] reads the
/// persisted record after the configured check delay and flips the ready
/// signal; consumers that make auth decisions wait on
/// [`SessionStore::wait_initialized`] first.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    user_key: String,
    settings: SessionSettings,
    current: Mutex<Option<User>>,
    /// Set by the first `initialize` call
    started: AtomicBool,
    ready: ReadySignal,
    subscribers: Subscribers<Option<User>>,
}

impl SessionStore {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        user_key: impl Into<String>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            storage,
            user_key: user_key.into(),
            settings,
            current: Mutex::new(None),
            started: AtomicBool::new(false),
            ready: ReadySignal::new(),
            subscribers: Subscribers::new(),
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Option<User>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, user: &User) {
        if let Err(e) = self.storage.set_json(&self.user_key, user) {
            tracing::warn!("[SessionStore] Failed to persist user: {}", e);
        }
    }

    /// Restores the persisted identity and marks the store initialized.
    ///
    /// Only a record flagged as logged in becomes the live session. Without
    /// durable storage the store becomes ready at once. Only the first call
    /// reads storage; later or overlapping calls just wait for it to finish.
    pub async fn initialize(&self) {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.ready.wait().await;
            return;
        }

        if !self.storage.is_available() {
            tracing::info!("[SessionStore] No durable storage, starting logged out");
            self.ready.mark_ready();
            return;
        }

        tokio::time::sleep(self.settings.check_delay()).await;

        let restored = match self.storage.get_json::<User>(&self.user_key) {
            Ok(Some(user)) if user.is_logged_in => Some(user),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("[SessionStore] Ignoring unreadable stored user: {}", e);
                None
            }
        };

        {
            let mut current = self.lock_current();
            // A login that finished during the check delay wins over the stored record.
            if current.is_none() {
                *current = restored;
            }
            match current.as_ref() {
                Some(user) => {
                    tracing::info!("[SessionStore] Restored session for {}", user.username)
                }
                None => tracing::info!("[SessionStore] Initialized without a session"),
            }
            self.subscribers.publish(current.clone());
        }

        self.subscribers.flush();
        self.ready.mark_ready();
    }

    /// Runs [`SessionStore::initialize`] on the current tokio runtime.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.initialize().await })
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.is_ready()
    }

    /// Suspends until initialization has completed.
    pub async fn wait_initialized(&self) {
        self.ready.wait().await;
    }

    /// Signs in with a fresh identity after the configured login delay.
    ///
    /// Always succeeds; validate a [`mireceta_core::user::LoginRequest`] first.
    pub async fn login(&self, username: &str, email: &str) -> User {
        tokio::time::sleep(self.settings.login_delay()).await;

        let user = User::sign_in(username, email);
        {
            let mut current = self.lock_current();
            self.persist(&user);
            *current = Some(user.clone());
            self.subscribers.publish(current.clone());
        }

        tracing::info!("[SessionStore] Logged in as {}", user.username);
        self.subscribers.flush();
        user
    }

    /// Ends the live session. The stored record is kept, flagged as logged out.
    pub fn logout(&self) {
        let previous = {
            let mut current = self.lock_current();
            if let Some(user) = current.as_ref() {
                self.persist(&user.signed_out());
            }
            self.subscribers.publish(None);
            current.take()
        };

        if let Some(user) = &previous {
            tracing::info!("[SessionStore] Logged out {}", user.username);
        }
        self.subscribers.flush();
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock_current()
            .as_ref()
            .is_some_and(|user| user.is_logged_in)
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock_current().clone()
    }

    /// Subscribes to identity changes, replaying the current identity first.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Option<User>) + Send + Sync + 'static,
    {
        let id = {
            let current = self.lock_current();
            self.subscribers
                .subscribe_and_replay(listener, current.clone())
        };
        self.subscribers.flush();
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user_key", &self.user_key)
            .field("initialized", &self.is_initialized())
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mireceta_infrastructure::{MemoryStorage, NoopStorage};
    use std::time::Duration;
    use tokio::time::Instant;

    const USER_KEY: &str = "mireceta_user";

    fn session_on(storage: Arc<dyn KeyValueStorage>) -> Arc<SessionStore> {
        Arc::new(SessionStore::new(storage, USER_KEY, SessionSettings::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_waits_for_check_delay() {
        let session = session_on(Arc::new(MemoryStorage::new()));
        let started = Instant::now();

        let handle = session.spawn_initialize();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!session.is_initialized());

        handle.await.unwrap();
        assert!(session.is_initialized());
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(!session.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_restores_logged_in_user() {
        let storage = Arc::new(MemoryStorage::new());
        let user = User::sign_in("ana", "ana@example.com");
        storage.set_json(USER_KEY, &user).unwrap();

        let session = session_on(storage);
        session.initialize().await;

        assert!(session.is_logged_in());
        assert_eq!(session.current_user(), Some(user));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_ignores_logged_out_record() {
        let storage = Arc::new(MemoryStorage::new());
        let user = User::sign_in("ana", "ana@example.com").signed_out();
        storage.set_json(USER_KEY, &user).unwrap();

        let session = session_on(storage);
        session.initialize().await;

        assert!(session.is_initialized());
        assert!(session.current_user().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_ignores_unreadable_record() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "not a user").unwrap();

        let session = session_on(storage);
        session.initialize().await;

        assert!(session.is_initialized());
        assert!(!session.is_logged_in());
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_storage_initializes_immediately() {
        let session = session_on(Arc::new(NoopStorage));
        let started = Instant::now();

        session.initialize().await;

        assert!(session.is_initialized());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_initialized_releases_waiters() {
        let session = session_on(Arc::new(MemoryStorage::new()));
        let waiter = {
            let session = session.clone();
            tokio::spawn(async move { session.wait_initialized().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        session.initialize().await;
        waiter.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_persists_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let session = session_on(storage.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        session.subscribe(move |user| {
            sink.lock()
                .unwrap()
                .push(user.as_ref().map(|u| u.username.clone()));
        });

        let started = Instant::now();
        let user = session.login("ana", "ana@example.com").await;

        assert!(started.elapsed() >= Duration::from_secs(1));
        assert!(session.is_logged_in());
        assert!(user.is_logged_in);
        let stored: User = storage.get_json(USER_KEY).unwrap().unwrap();
        assert_eq!(stored, user);
        assert_eq!(*seen.lock().unwrap(), vec![None, Some("ana".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_keeps_record_flagged_out() {
        let storage = Arc::new(MemoryStorage::new());
        let session = session_on(storage.clone());
        let user = session.login("ana", "ana@example.com").await;

        session.logout();

        assert!(!session.is_logged_in());
        assert!(session.current_user().is_none());
        let stored: User = storage.get_json(USER_KEY).unwrap().unwrap();
        assert_eq!(stored.id, user.id);
        assert!(!stored.is_logged_in);
    }

    #[test]
    fn test_logout_without_session_still_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let session = session_on(storage.clone());
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        session.subscribe(move |_| *counter.lock().unwrap() += 1);

        session.logout();

        assert_eq!(*count.lock().unwrap(), 2);
        assert!(storage.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_initialize_restores_once() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_json(USER_KEY, &User::sign_in("ana", "ana@example.com"))
            .unwrap();
        let session = session_on(storage);
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        session.subscribe(move |_| *counter.lock().unwrap() += 1);

        let first = session.spawn_initialize();
        let second = session.spawn_initialize();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        first.await.unwrap();
        second.await.unwrap();
        session.initialize().await;

        assert!(session.is_logged_in());
        // Replay plus a single restore
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn test_racing_logout_and_login_deliver_in_commit_order() {
        let session = Arc::new(SessionStore::new(
            Arc::new(MemoryStorage::new()),
            USER_KEY,
            SessionSettings {
                check_delay_ms: 0,
                login_delay_ms: 0,
            },
        ));
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            session.login("ana", "ana@example.com").await;
        });

        let last_seen = Arc::new(Mutex::new(Some(String::new())));
        let sink = last_seen.clone();
        session.subscribe(move |user| {
            if user.is_none() {
                std::thread::sleep(Duration::from_millis(100));
            }
            *sink.lock().unwrap() = user.as_ref().map(|u| u.username.clone());
        });

        let logout = {
            let session = session.clone();
            std::thread::spawn(move || session.logout())
        };
        std::thread::sleep(Duration::from_millis(20));
        let login = {
            let session = session.clone();
            std::thread::spawn(move || {
                tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                    .unwrap()
                    .block_on(async { session.login("luis", "luis@example.com").await })
            })
        };
        logout.join().unwrap();
        login.join().unwrap();

        assert_eq!(session.current_user().unwrap().username, "luis");
        assert_eq!(*last_seen.lock().unwrap(), Some("luis".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_during_check_delay_is_kept() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_json(USER_KEY, &User::sign_in("old", "old@example.com"))
            .unwrap();
        let session = Arc::new(SessionStore::new(
            storage,
            USER_KEY,
            SessionSettings {
                check_delay_ms: 500,
                login_delay_ms: 0,
            },
        ));

        let init = session.spawn_initialize();
        session.login("ana", "ana@example.com").await;
        init.await.unwrap();

        assert_eq!(session.current_user().unwrap().username, "ana");
    }
}
