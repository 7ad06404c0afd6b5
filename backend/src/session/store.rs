use crate::session::SessionState;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A session behind its own lock; every mutation of one session goes
/// through it.
pub type SharedSession = Arc<Mutex<SessionState>>;

struct Entry {
    session: SharedSession,
    last_used: u64,
}

#[derive(Default)]
struct Sessions {
    by_token: HashMap<String, Entry>,
    tick: u64,
}

/// All live sessions, bounded by an LRU on access time.
///
/// Created once in `main` and shared through the application state.
pub struct SessionStore {
    sessions: Mutex<Sessions>,
    max_sessions: usize,
    max_tasks: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize, max_tasks: usize) -> Self {
        Self {
            sessions: Mutex::new(Sessions::default()),
            max_sessions: max_sessions.max(1),
            max_tasks,
        }
    }

    /// The session for `token`, created empty on first use.
    pub async fn get(&self, token: &str) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        sessions.tick += 1;
        let tick = sessions.tick;

        if let Some(entry) = sessions.by_token.get_mut(token) {
            entry.last_used = tick;
            return entry.session.clone();
        }

        while sessions.by_token.len() >= self.max_sessions {
            let oldest = sessions
                .by_token
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(token, _)| token.clone());
            let Some(oldest) = oldest else { break };
            sessions.by_token.remove(&oldest);
            info!("Evicted idle session '{}'", oldest);
        }

        let session = Arc::new(Mutex::new(SessionState::new(self.max_tasks)));
        sessions.by_token.insert(
            token.to_string(),
            Entry {
                session: session.clone(),
                last_used: tick,
            },
        );
        info!("Created session '{}'", token);
        session
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.by_token.len()
    }

    pub async fn contains(&self, token: &str) -> bool {
        self.sessions.lock().await.by_token.contains_key(token)
    }
}
