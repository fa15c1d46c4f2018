use shared::domain::{User, UserId};

use crate::{contains_ignore_case, Collection, Page};

pub const SEED_USER_COUNT: i64 = 50;

/// Read-only user list behind the search and infinite-scroll demos.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Collection<User>,
}

impl UserDirectory {
    pub fn new(seed: Vec<User>) -> Self {
        Self {
            users: Collection::new(seed),
        }
    }

    /// `User 1` .. `User 50` with matching example.com addresses.
    pub fn seeded() -> Self {
        Self::new(
            (1..=SEED_USER_COUNT)
                .map(|n| User::new(n, format!("User {n}"), format!("user{n}@example.com")))
                .collect(),
        )
    }

    pub fn list(&self) -> &[User] {
        self.users.list()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(id)
    }

    /// Case-insensitive substring match on name or email. An empty query
    /// matches everyone.
    pub fn search(&self, query: &str) -> Vec<User> {
        let needle = query.trim().to_lowercase();
        self.users.find(|user| {
            contains_ignore_case(&user.name, &needle) || contains_ignore_case(&user.email, &needle)
        })
    }

    pub fn page(&self, offset: usize, limit: usize) -> Page<User> {
        self.users.page(offset, limit)
    }
}

#[cfg(test)]
#[path = "tests/users_tests.rs"]
mod tests;
