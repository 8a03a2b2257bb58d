//! Property-based tests for the canonical intent digest: deterministic over
//! identical fields, sensitive to every signed field, indifferent to the
//! signature itself.

use intent_relayer::models::{Address, Intent, U256};
use proptest::{prelude::*, test_runner::Config};

prop_compose! {
    fn arb_intent()(
        user in proptest::array::uniform20(any::<u8>()),
        target in proptest::array::uniform20(any::<u8>()),
        calldata in proptest::collection::vec(any::<u8>(), 0..128),
        value in any::<u128>(),
        execute_after in 0u64..u64::MAX / 2,
        window in 1u64..1_000_000,
        nonce in any::<u64>()
    ) -> Intent {
        Intent {
            user: Address(user),
            target: Address(target),
            calldata,
            value: U256::from(value),
            execute_after,
            execute_before: execute_after + window,
            nonce,
            signature: vec![0u8; 65],
        }
    }
}

proptest! {
  #![proptest_config(Config {
    cases: 500, ..Config::default()
  })]

  #[test]
  fn prop_digest_is_deterministic(intent in arb_intent()) {
      prop_assert_eq!(intent.signing_digest(), intent.signing_digest());
  }

  #[test]
  fn prop_digest_ignores_signature(intent in arb_intent(), sig in proptest::collection::vec(any::<u8>(), 65)) {
      let mut resigned = intent.clone();
      resigned.signature = sig;
      prop_assert_eq!(resigned.signing_digest(), intent.signing_digest());
  }

  #[test]
  fn prop_digest_depends_on_nonce(intent in arb_intent(), other_nonce in any::<u64>()) {
      prop_assume!(other_nonce != intent.nonce);
      let mut changed = intent.clone();
      changed.nonce = other_nonce;
      prop_assert_ne!(changed.signing_digest(), intent.signing_digest());
  }

  #[test]
  fn prop_digest_depends_on_deadline(intent in arb_intent(), shift in 1u64..1_000) {
      let mut changed = intent.clone();
      changed.execute_before += shift;
      prop_assert_ne!(changed.signing_digest(), intent.signing_digest());
  }

  #[test]
  fn prop_digest_depends_on_calldata(intent in arb_intent()) {
      let mut changed = intent.clone();
      changed.calldata.push(0x00);
      prop_assert_ne!(changed.signing_digest(), intent.signing_digest());
  }
}
