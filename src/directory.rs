use regex::Regex;

use crate::entities::{User, UserId};

lazy_static::lazy_static! {
    static ref SEED_USERS: Vec<User> = vec![
        seed(1, "Alex Johnson", "Coffee, code and long walks.", "https://i.pravatar.cc/150?img=1"),
        seed(2, "Sarah Williams", "Photographer. Always chasing golden hour.", "https://i.pravatar.cc/150?img=5"),
        seed(3, "Mike Chen", "Runner, reader, occasional baker.", "https://i.pravatar.cc/150?img=3"),
        seed(4, "Emma Davis", "Travel notes from everywhere.", "https://i.pravatar.cc/150?img=9"),
    ];
}

fn seed(id: u64, name: &str, bio: &str, profile_pic: &str) -> User {
    User {
        id: UserId(id),
        name: name.to_string(),
        bio: bio.to_string(),
        profile_pic: profile_pic.to_string(),
    }
}

/// fixed set of users known for the whole session.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub const DEFAULT_USER: UserId = UserId(1);

    pub fn seeded() -> Self {
        Self {
            users: SEED_USERS.clone(),
        }
    }

    pub fn all(&self) -> &[User] { &self.users }

    pub fn find(&self, id: UserId) -> Option<&User> { self.users.iter().find(|u| u.id == id) }

    pub fn contains(&self, id: UserId) -> bool { self.find(id).is_some() }

    pub fn search<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = &'a User> {
        self.users.iter().filter(move |u| pattern.is_match(&u.name))
    }
}

impl Default for UserDirectory {
    fn default() -> Self { Self::seeded() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_default_user() {
        let dir = UserDirectory::seeded();

        assert!(dir.contains(UserDirectory::DEFAULT_USER));
        assert!(!dir.contains(UserId(0)));
    }

    #[test]
    fn seed_ids_are_unique() {
        let dir = UserDirectory::seeded();
        let mut ids = dir.all().iter().map(|u| u.id).collect::<Vec<_>>();
        ids.sort();
        ids.dedup();

        assert_eq!(ids.len(), dir.all().len());
    }

    #[test]
    fn search_by_name() {
        let dir = UserDirectory::seeded();
        let rx = Regex::new("(?i)^s").unwrap();

        let found = dir.search(&rx).map(|u| u.id).collect::<Vec<_>>();
        assert_eq!(found, vec![UserId(2)]);
    }
}
