//! Seeded demo users mirroring the dataset the front end ships with.
//! The registry here is the concrete stand-in for whatever directory a real
//! deployment would consult; tests build their own with `with_users`.

use crate::identity::{Role, User, UserRegistry};

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            username: "user001".to_string(),
            password: "123456".to_string(),
            role: Role::Citizen,
            name: "Zhang San".to_string(),
            phone: "13812345678".to_string(),
            department: None,
        },
        User {
            id: 2,
            username: "responder001".to_string(),
            password: "123456".to_string(),
            role: Role::Responder,
            name: "Li Wei".to_string(),
            phone: "13987654321".to_string(),
            department: Some("Wuhan Municipal Fire Brigade".to_string()),
        },
    ]
}

pub struct MockUserRegistry {
    users: Vec<User>,
}

impl MockUserRegistry {
    pub fn new() -> Self {
        Self { users: seed_users() }
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl Default for MockUserRegistry {
    fn default() -> Self { Self::new() }
}

impl UserRegistry for MockUserRegistry {
    fn find_user(&self, username: &str, password: &str, role: Role) -> Option<User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password && u.role == role)
            .cloned()
    }
}
