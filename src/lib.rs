//! # Espresso (accounts & table reservations)
//!
//! `espresso` is the backend behind the restaurant site. It serves three static
//! pages and four JSON endpoints:
//!
//! - `POST /signup-form` creates an account. Passwords are stored as salted
//!   Argon2id hashes in PHC format, so the salt travels with the hash.
//! - `POST /login-form` checks a username/password pair. Unknown users and wrong
//!   passwords get the same answer.
//! - `POST /submit_reservation` stores a reservation. Six fields are required;
//!   anything else the caller sends is kept as-is.
//! - `GET /get_reservations` lists every reservation in insertion order.
//!
//! ## Storage
//!
//! Handlers talk to a [`store::Store`] injected as an axum `Extension`. The
//! production backend is MongoDB ([`store::MongoStore`], collections `users`
//! and `reservations`); [`store::MemoryStore`] keeps everything in process.
//!
//! Username uniqueness is a lookup before the insert, not a unique index. Two
//! concurrent signups for the same name can both succeed.
//!
//! ## Responses
//!
//! Every JSON endpoint answers with the same envelope,
//! `{"success": bool, "message"?: string, "reservations"?: [...]}`, and the same
//! status policy: `200` on success, `400` for validation, duplicate and
//! credential failures, `500` for anything unexpected.

pub mod api;
pub mod cli;
pub mod password;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
