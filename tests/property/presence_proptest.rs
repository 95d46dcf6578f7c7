//! Property-based tests for the presence registry

use proptest::prelude::*;
use ripplechat::relay::presence::PresenceRegistry;
use std::collections::HashMap;

proptest! {
    /// A user is online iff they have more connections opened than closed,
    /// under any interleaving of connects and disconnects.
    #[test]
    fn test_online_iff_positive_connection_count(
        ops in prop::collection::vec((0i64..5, prop::bool::ANY), 0..64),
    ) {
        let registry = PresenceRegistry::new();
        let mut counts: HashMap<i64, usize> = HashMap::new();

        for (user, connects) in ops {
            if connects {
                let count = counts.entry(user).or_insert(0);
                *count += 1;
                let came_online = registry.mark_online(user);
                prop_assert_eq!(came_online, *count == 1);
            } else {
                let count = counts.entry(user).or_insert(0);
                let went_offline = registry.mark_offline(user);
                if *count > 0 {
                    *count -= 1;
                    prop_assert_eq!(went_offline, *count == 0);
                } else {
                    // Disconnect without a connection is a no-op.
                    prop_assert!(!went_offline);
                }
            }
        }

        for (user, count) in &counts {
            prop_assert_eq!(registry.is_online(*user), *count > 0);
        }

        let mut snapshot = registry.snapshot();
        snapshot.sort_unstable();
        let mut expected: Vec<i64> = counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(user, _)| *user)
            .collect();
        expected.sort_unstable();
        prop_assert_eq!(snapshot, expected);
    }
}
