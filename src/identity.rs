use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{PlayerIdentity, UserId};
use crate::error::ScoresError;
use crate::osu::OsuClient;
use crate::pacing::Pacer;

pub fn unknown_user_name(id: UserId) -> String {
    format!("Unknown user {id}")
}

/// Memoized user id to display name resolution. Each id reaches the upstream
/// at most once per run; an id the upstream does not know gets a placeholder.
#[derive(Debug, Default)]
pub struct IdentityCache {
    identities: Vec<PlayerIdentity>,
    index: HashMap<UserId, usize>,
    lookups: usize,
    unknown: usize,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: UserId) -> Option<&PlayerIdentity> {
        self.index.get(&id).map(|&slot| &self.identities[slot])
    }

    pub fn resolve<C, P>(
        &mut self,
        id: UserId,
        client: &C,
        pacer: &P,
    ) -> Result<&PlayerIdentity, ScoresError>
    where
        C: OsuClient + ?Sized,
        P: Pacer + ?Sized,
    {
        if let Some(&slot) = self.index.get(&id) {
            return Ok(&self.identities[slot]);
        }

        let lookup = client.get_user(id)?;
        self.lookups += 1;
        pacer.pause();

        let username = lookup.map(|user| user.username).or_substitute(|| {
            warn!(user_id = %id, "user not found upstream, using placeholder name");
            self.unknown += 1;
            unknown_user_name(id)
        });
        debug!(user_id = %id, %username, "resolved player");

        let slot = self.identities.len();
        self.identities.push(PlayerIdentity {
            user_id: id,
            username,
        });
        self.index.insert(id, slot);
        Ok(&self.identities[slot])
    }

    /// Identities in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerIdentity> {
        self.identities.iter()
    }

    pub fn into_identities(self) -> Vec<PlayerIdentity> {
        self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// Number of lookups that reached the upstream.
    pub fn lookups(&self) -> usize {
        self.lookups
    }

    pub fn unknown(&self) -> usize {
        self.unknown
    }
}
