//! Role names carried in JWT claims and the `users.role` column.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Roles a user row may hold.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

pub fn is_admin(role: &str) -> bool {
    role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_role_is_admin() {
        assert!(is_admin(ROLE_ADMIN));
        assert!(!is_admin(ROLE_USER));
        assert!(!is_admin("Admin"));
    }
}
