//! Property-based tests for the presence registry
//!
//! Random register/remove sequences are replayed against the registry
//! and a plain map model.

use chatme::backend::presence::PresenceRegistry;
use chatme::shared::{ConnectionHandle, UserId};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    /// Register a user on a brand-new connection
    Connect(u8),
    /// Re-register an existing connection (by index) under a user
    Reregister(usize, u8),
    /// Disconnect an existing connection (by index)
    Disconnect(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..6).prop_map(Op::Connect),
        (any::<usize>(), 0u8..6).prop_map(|(h, u)| Op::Reregister(h, u)),
        any::<usize>().prop_map(Op::Disconnect),
    ]
}

fn user(n: u8) -> UserId {
    UserId::new(format!("user-{}", n))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn lookup_returns_latest_registration(users in proptest::collection::vec(0u8..4, 1..40)) {
        runtime().block_on(async {
            let registry = PresenceRegistry::new();
            let mut latest: HashMap<UserId, ConnectionHandle> = HashMap::new();

            for n in users {
                let handle = ConnectionHandle::generate();
                registry.register(user(n), handle.clone()).await;
                latest.insert(user(n), handle);
            }

            for (user_id, handle) in &latest {
                prop_assert_eq!(registry.lookup(user_id).await, Some(handle.clone()));
            }
            prop_assert_eq!(registry.len().await, latest.len());
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn registry_matches_model(ops in proptest::collection::vec(op(), 1..60)) {
        runtime().block_on(async {
            let registry = PresenceRegistry::new();
            let mut handles: Vec<ConnectionHandle> = Vec::new();
            // model: user -> handle, handle -> user
            let mut by_user: HashMap<UserId, ConnectionHandle> = HashMap::new();
            let mut by_handle: HashMap<ConnectionHandle, UserId> = HashMap::new();

            for op in ops {
                let op = match op {
                    Op::Reregister(_, n) if handles.is_empty() => Op::Connect(n),
                    other => other,
                };
                match op {
                    Op::Connect(n) => {
                        let handle = ConnectionHandle::generate();
                        handles.push(handle.clone());
                        model_register(&mut by_user, &mut by_handle, user(n), handle.clone());
                        registry.register(user(n), handle).await;
                    }
                    Op::Reregister(i, n) => {
                        let handle = handles[i % handles.len()].clone();
                        model_register(&mut by_user, &mut by_handle, user(n), handle.clone());
                        registry.register(user(n), handle).await;
                    }
                    Op::Disconnect(i) => {
                        if handles.is_empty() {
                            continue;
                        }
                        let handle = handles[i % handles.len()].clone();
                        let expected = by_handle.remove(&handle);
                        if let Some(u) = &expected {
                            by_user.remove(u);
                        }
                        prop_assert_eq!(registry.remove_by_handle(&handle).await, expected.clone());
                        if let Some(u) = expected {
                            prop_assert_eq!(registry.lookup(&u).await, None);
                        }
                    }
                }

                // both directions stay inverse of each other
                for (u, h) in &by_user {
                    prop_assert_eq!(registry.lookup(u).await, Some(h.clone()));
                    prop_assert_eq!(registry.user_for(h).await, Some(u.clone()));
                }
                prop_assert_eq!(registry.len().await, by_user.len());
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}

fn model_register(
    by_user: &mut HashMap<UserId, ConnectionHandle>,
    by_handle: &mut HashMap<ConnectionHandle, UserId>,
    user_id: UserId,
    handle: ConnectionHandle,
) {
    if let Some(previous) = by_handle.remove(&handle) {
        by_user.remove(&previous);
    }
    if let Some(old) = by_user.insert(user_id.clone(), handle.clone()) {
        by_handle.remove(&old);
    }
    by_handle.insert(handle, user_id);
}
