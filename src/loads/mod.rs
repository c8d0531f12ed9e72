mod spawner;

pub use spawner::{Job, Spawn, ThreadSpawner};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadFamily {
    Media,
    Skin,
}

impl std::fmt::Display for LoadFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadFamily::Media => write!(f, "media"),
            LoadFamily::Skin => write!(f, "skin"),
        }
    }
}

/// Identifies one initiated load. Tokens are strictly increasing per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    family: LoadFamily,
    token: u64,
}

impl LoadTicket {
    pub fn family(&self) -> LoadFamily {
        self.family
    }

    pub fn token(&self) -> u64 {
        self.token
    }
}

/// An in-flight load as handed to the worker that performs it.
#[derive(Debug, Clone)]
pub struct LoadOperation {
    ticket: LoadTicket,
    superseded: Arc<AtomicBool>,
}

impl LoadOperation {
    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Set once a newer load of the same family starts. Only useful for
    /// skipping work; the token check at completion is what discards results.
    pub fn is_superseded(&self) -> bool {
        self.superseded.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
struct FamilyCursor {
    issued: u64,
    pending: Option<(u64, Arc<AtomicBool>)>,
}

impl FamilyCursor {
    fn begin(&mut self) -> (u64, Arc<AtomicBool>) {
        if let Some((_, flag)) = self.pending.take() {
            flag.store(true, Ordering::Relaxed);
        }

        self.issued += 1;
        let flag = Arc::new(AtomicBool::new(false));
        self.pending = Some((self.issued, Arc::clone(&flag)));

        (self.issued, flag)
    }

    fn is_current(&self, token: u64) -> bool {
        matches!(&self.pending, Some((current, _)) if *current == token)
    }
}

/// Tracks the latest load per family and rejects stale completions.
#[derive(Default)]
pub struct LoadCoordinator {
    media: FamilyCursor,
    skin: FamilyCursor,
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn cursor(&self, family: LoadFamily) -> &FamilyCursor {
        match family {
            LoadFamily::Media => &self.media,
            LoadFamily::Skin => &self.skin,
        }
    }

    fn cursor_mut(&mut self, family: LoadFamily) -> &mut FamilyCursor {
        match family {
            LoadFamily::Media => &mut self.media,
            LoadFamily::Skin => &mut self.skin,
        }
    }

    /// Issue a new token for `family`; any older load of that family is now stale.
    pub fn begin(&mut self, family: LoadFamily) -> LoadOperation {
        let (token, superseded) = self.cursor_mut(family).begin();

        LoadOperation {
            ticket: LoadTicket { family, token },
            superseded,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.cursor(ticket.family).is_current(ticket.token)
    }

    /// Consume a completion. Returns `false` when the ticket is stale, in
    /// which case nothing changes.
    pub fn settle(&mut self, ticket: LoadTicket) -> bool {
        let cursor = self.cursor_mut(ticket.family);
        if !cursor.is_current(ticket.token) {
            return false;
        }
        cursor.pending = None;
        true
    }

    pub fn is_pending(&self, family: LoadFamily) -> bool {
        self.cursor(family).pending.is_some()
    }

    pub fn any_pending(&self) -> bool {
        self.is_pending(LoadFamily::Media) || self.is_pending(LoadFamily::Skin)
    }

    pub fn latest_token(&self, family: LoadFamily) -> u64 {
        self.cursor(family).issued
    }
}
