//! The single user's in-memory state: loaded terms, quiz session and RNG.

use quiz_core::{Event, Session, SessionError, TermStore};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Workspace {
    pub store: TermStore,
    session: Session,
    rng: StdRng,
}

impl Workspace {
    /// Seeded workspaces build identical quizzes for identical inputs.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            store: TermStore::new(),
            session: Session::new(),
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run `event` through the session, keeping the old state on error.
    pub fn apply(&mut self, event: Event) -> Result<&Session, SessionError> {
        let session = std::mem::take(&mut self.session);
        match session.apply(event, &mut self.rng) {
            Ok(next) => self.session = next,
            Err(rejected) => {
                self.session = rejected.session;
                return Err(rejected.error);
            }
        }
        Ok(&self.session)
    }

    /// Start a round over every loaded term.
    pub fn start(&mut self, question_count: usize) -> Result<&Session, SessionError> {
        let terms = self.store.all_terms();
        self.apply(Event::Start {
            terms,
            question_count,
        })
    }

    /// Back to an empty workspace. Only allowed while no round is running.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.apply(Event::Restart)?;
        self.store.clear();
        Ok(())
    }
}
