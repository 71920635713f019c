//! Caller-facing operations. Store failures stop here and come back as text.

use crate::db::Db;
use user_memory_types::Fact;

pub const NO_INFO_MESSAGE: &str = "I don't have any information stored about this user yet.";

/// Remember one fact about `user_id`.
pub fn store_user_info(db: &Db, fact: &str, user_id: &str) -> String {
    match db.append(user_id, fact) {
        Ok(id) => {
            log::info!("Stored fact: {} (ID: {})", fact, id);
            format!("Stored: {}", fact)
        }
        Err(e) => {
            log::error!("Error storing fact: {}", e);
            format!("Error storing fact: {}", e)
        }
    }
}

/// Everything remembered about `user_id`, as a numbered list.
pub fn get_user_info(db: &Db, user_id: &str) -> String {
    match db.list_by_user(user_id) {
        Ok(facts) if facts.is_empty() => NO_INFO_MESSAGE.to_string(),
        Ok(facts) => {
            log::info!("Retrieved {} facts for user {}", facts.len(), user_id);
            render_facts(&facts)
        }
        Err(e) => {
            log::error!("Error retrieving user info: {}", e);
            format!("Error retrieving user info: {}", e)
        }
    }
}

fn render_facts(facts: &[Fact]) -> String {
    let mut out = String::from("Here's what I know about the user:\n\n");
    for (i, fact) in facts.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, fact.text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use user_memory_types::DEFAULT_USER_ID;

    fn test_db() -> (tempfile::TempDir, Db) {
        let dir = tempfile::TempDir::new().expect("create temp dir");
        let path = dir.path().join("user_memory.db");
        let db = Db::open(path.to_str().unwrap(), 2).expect("open db");
        (dir, db)
    }

    #[test]
    fn store_then_recall() {
        let (_dir, db) = test_db();
        let reply = store_user_info(&db, "The user lives in Singapore", DEFAULT_USER_ID);
        assert!(reply.contains("The user lives in Singapore"));

        let info = get_user_info(&db, DEFAULT_USER_ID);
        assert!(info.contains("1. The user lives in Singapore"));
    }

    #[test]
    fn recall_renders_numbered_list() {
        let (_dir, db) = test_db();
        store_user_info(&db, "The user has a cat called Wendy", "u1");
        store_user_info(&db, "The user prefers Python over JavaScript", "u1");

        assert_eq!(
            get_user_info(&db, "u1"),
            "Here's what I know about the user:\n\n\
             1. The user has a cat called Wendy\n\
             2. The user prefers Python over JavaScript\n"
        );
    }

    #[test]
    fn unknown_user_gets_fixed_sentence() {
        let (_dir, db) = test_db();
        assert_eq!(get_user_info(&db, "nobody"), NO_INFO_MESSAGE);
    }

    #[test]
    fn alice_and_bob_do_not_mix() {
        let (_dir, db) = test_db();
        store_user_info(&db, "fact A", "alice");
        store_user_info(&db, "fact B", "bob");

        let alice = get_user_info(&db, "alice");
        let bob = get_user_info(&db, "bob");
        assert!(alice.contains("1. fact A"));
        assert!(!alice.contains("fact B"));
        assert!(bob.contains("1. fact B"));
        assert!(!bob.contains("fact A"));
    }

    #[test]
    fn store_failure_comes_back_as_text() {
        let (dir, db) = test_db();
        let side = rusqlite::Connection::open(dir.path().join("user_memory.db")).expect("open side");
        side.execute_batch("DROP TABLE user_facts").expect("drop table");

        let reply = store_user_info(&db, "lost", DEFAULT_USER_ID);
        assert!(reply.starts_with("Error storing fact: "), "{}", reply);

        let info = get_user_info(&db, DEFAULT_USER_ID);
        assert!(info.starts_with("Error retrieving user info: "), "{}", info);
    }
}
