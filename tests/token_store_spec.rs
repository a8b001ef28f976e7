use std::fs;

use speculate2::speculate;
use tasklane_mcp::auth::{TokenSource, TokenStore};

speculate! {
    before {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let dir = temp.path().join("tasklane");
        let store = TokenStore::new(Some(dir.clone()), None);
    }

    describe "tokens" {
        describe "get_token" {
            it "returns None when nothing is stored" {
                assert!(store.get_token().is_none());
                assert_eq!(store.token_source(), TokenSource::None);
            }

            it "returns a saved token" {
                store.save_token("abc").expect("Failed to save token");

                assert_eq!(store.get_token().as_deref(), Some("abc"));
                assert_eq!(store.token_source(), TokenSource::File);
            }

            it "prefers the environment token over the stored file" {
                store.save_token("from-file").expect("Failed to save token");
                let env_store = TokenStore::new(Some(dir.clone()), Some("from-env".to_string()));

                assert_eq!(env_store.get_token().as_deref(), Some("from-env"));
                assert_eq!(env_store.token_source(), TokenSource::Environment);
            }

            it "ignores a blank environment token" {
                store.save_token("from-file").expect("Failed to save token");
                let env_store = TokenStore::new(Some(dir.clone()), Some("  ".to_string()));

                assert_eq!(env_store.get_token().as_deref(), Some("from-file"));
            }

            it "treats a corrupt token file as no token" {
                fs::create_dir_all(&dir).expect("Failed to create dir");
                fs::write(dir.join("mcp-token.json"), "{not json").expect("Failed to write");

                assert!(store.get_token().is_none());
            }

            it "works without a config directory" {
                let env_only = TokenStore::new(None, Some("env".to_string()));
                assert_eq!(env_only.get_token().as_deref(), Some("env"));

                let nothing = TokenStore::new(None, None);
                assert!(nothing.get_token().is_none());
                assert!(nothing.save_token("abc").is_err());
            }
        }

        describe "save_token" {
            it "records when the token was saved" {
                store.save_token("abc").expect("Failed to save token");

                let raw = fs::read_to_string(dir.join("mcp-token.json")).expect("Failed to read");
                let json: serde_json::Value = serde_json::from_str(&raw).expect("Invalid JSON");
                assert_eq!(json["token"], "abc");
                assert!(json["savedAt"].is_string());
            }

            it "overwrites the previous token" {
                store.save_token("first").expect("Failed to save token");
                store.save_token("second").expect("Failed to save token");

                assert_eq!(store.get_token().as_deref(), Some("second"));
            }

            it "restricts directory and file permissions" {
                store.save_token("abc").expect("Failed to save token");

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let dir_mode = fs::metadata(&dir).expect("stat dir").permissions().mode();
                    let file_mode = fs::metadata(dir.join("mcp-token.json"))
                        .expect("stat file")
                        .permissions()
                        .mode();
                    assert_eq!(dir_mode & 0o777, 0o700);
                    assert_eq!(file_mode & 0o777, 0o600);
                }
            }
        }

        describe "clear_token" {
            it "is idempotent" {
                store.clear_token().expect("First clear failed");
                store.save_token("abc").expect("Failed to save token");
                store.clear_token().expect("Second clear failed");
                store.clear_token().expect("Third clear failed");

                assert!(store.get_token().is_none());
            }

            it "leaves a pending login alone" {
                store.save_token("abc").expect("Failed to save token");
                store.save_pending_device_code("dc-1", 600).expect("Failed to save pending");

                store.clear_token().expect("Failed to clear token");

                assert!(store.get_pending_device_code().is_some());
            }
        }
    }

    describe "pending device code" {
        it "stores expires_at as created_at plus expires_in in milliseconds" {
            let pending = store
                .save_pending_device_code_at("dc-1", 900, 1_000)
                .expect("Failed to save pending");

            assert_eq!(pending.created_at, 1_000);
            assert_eq!(pending.expires_at, 901_000);
        }

        it "saturates an absurd expiry instead of wrapping into the past" {
            let pending = store
                .save_pending_device_code_at("dc-1", u64::MAX, 1_000)
                .expect("Failed to save pending");

            assert_eq!(pending.expires_at, i64::MAX);
            assert!(store.get_pending_device_code().is_some());

            let near_limit = store
                .save_pending_device_code_at("dc-2", (i64::MAX / 1000) as u64, 1_000)
                .expect("Failed to save pending");
            assert_eq!(near_limit.expires_at, i64::MAX);
        }

        it "is still valid exactly at expires_at" {
            store.save_pending_device_code_at("dc-1", 10, 0).expect("Failed to save pending");

            let pending = store.get_pending_device_code_at(10_000);

            assert_eq!(pending.map(|p| p.device_code).as_deref(), Some("dc-1"));
        }

        it "expires and removes the file once past expires_at" {
            store.save_pending_device_code_at("dc-1", 10, 0).expect("Failed to save pending");

            assert!(store.get_pending_device_code_at(10_001).is_none());
            assert!(!dir.join("pending-auth.json").exists());
            assert!(store.get_pending_device_code_at(0).is_none());
        }

        it "keeps only the latest login" {
            store.save_pending_device_code("dc-1", 600).expect("Failed to save pending");
            store.save_pending_device_code("dc-2", 600).expect("Failed to save pending");

            let pending = store.get_pending_device_code().expect("Expected pending code");
            assert_eq!(pending.device_code, "dc-2");
        }

        it "leaves the token alone when cleared" {
            store.save_token("abc").expect("Failed to save token");
            store.save_pending_device_code("dc-1", 600).expect("Failed to save pending");

            store.clear_pending_device_code().expect("Failed to clear pending");
            store.clear_pending_device_code().expect("Second clear failed");

            assert!(store.get_pending_device_code().is_none());
            assert_eq!(store.get_token().as_deref(), Some("abc"));
        }
    }
}
