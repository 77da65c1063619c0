use proptest::prelude::*;

use tessera::crypto::tx::tx_sign_bytes;
use tessera::gas::GasPool;
use tessera::rules::ChainConfig;
use tessera::types::{Address, Bloom, Tx};

fn arb_tx() -> impl Strategy<Value = Tx> {
    (
        proptest::collection::vec(any::<u8>(), 0..64),
        any::<u64>(),
        any::<u64>(),
        any::<u64>(),
        proptest::option::of(any::<[u8; 20]>().prop_map(Address)),
        any::<u128>(),
        proptest::collection::vec(any::<u8>(), 0..256),
        proptest::collection::vec(any::<u8>(), 0..96),
        any::<u64>(),
    )
        .prop_map(
            |(pubkey, nonce, gas_price, gas_limit, to, value, payload, signature, chain_id)| Tx {
                pubkey,
                nonce,
                gas_price,
                gas_limit,
                to,
                value,
                payload,
                signature,
                chain_id,
            },
        )
}

proptest! {
    #[test]
    fn tx_hash_is_deterministic(tx in arb_tx()) {
        prop_assert_eq!(tx.hash(), tx.hash());
    }

    #[test]
    fn sign_bytes_exclude_the_signature(tx in arb_tx(), sig in proptest::collection::vec(any::<u8>(), 0..96)) {
        let mut resigned = tx.clone();
        resigned.signature = sig;
        prop_assert_eq!(tx_sign_bytes(&tx), tx_sign_bytes(&resigned));
        prop_assert_eq!(tx.hash(), resigned.hash());
    }

    #[test]
    fn gas_pool_never_goes_negative(start in 0u64..10_000_000, ops in proptest::collection::vec((any::<bool>(), 0u64..1_000_000), 0..64)) {
        let mut pool = GasPool::new(start);
        let mut expected = start;
        for (is_sub, amount) in ops {
            if is_sub {
                match pool.sub_gas(amount) {
                    Ok(()) => {
                        prop_assert!(amount <= expected);
                        expected -= amount;
                    }
                    Err(e) => {
                        prop_assert!(amount > expected);
                        prop_assert_eq!(e.remaining, expected);
                    }
                }
            } else {
                pool.add_gas(amount);
                expected = expected.saturating_add(amount);
            }
            prop_assert_eq!(pool.remaining(), expected);
        }
    }

    #[test]
    fn bloom_contains_every_inserted_item(items in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..48), 0..32)) {
        let mut bloom = Bloom::empty();
        for item in &items {
            bloom.set(item);
        }
        for item in &items {
            prop_assert!(bloom.contains(item));
        }
    }

    #[test]
    fn fork_rules_are_monotone_in_height(from in any::<u64>(), height in any::<u64>()) {
        let cfg = ChainConfig {
            chain_id: 1,
            status_receipts_from: Some(from),
            prune_empty_from: Some(from),
        };
        let rules = cfg.rules_at(height);
        prop_assert_eq!(rules.status_receipts, height >= from);
        prop_assert_eq!(rules.prune_empty_accounts, height >= from);
    }
}
