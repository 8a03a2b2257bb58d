//! Property-based tests for per-user nonce sequencing: admitted nonces form
//! a strictly increasing sequence with no gaps and no repeats, whatever the
//! submission order.

use std::sync::Arc;

use intent_relayer::{
    models::Address,
    repositories::InMemoryUserSequenceStore,
    services::NonceSequencer,
};
use proptest::{prelude::*, test_runner::Config};

fn sequencer() -> NonceSequencer {
    NonceSequencer::new(Arc::new(InMemoryUserSequenceStore::new()))
}

proptest! {
  #![proptest_config(Config {
    cases: 200, ..Config::default()
  })]

  /// Feeding an arbitrary stream of nonces admits exactly the in-order
  /// prefix values and nothing else.
  #[test]
  fn prop_admitted_nonces_form_contiguous_sequence(
    submissions in proptest::collection::vec(0u64..20, 1..60)
  ) {
      let rt = tokio::runtime::Builder::new_current_thread()
          .build()
          .unwrap();
      rt.block_on(async {
          let sequencer = sequencer();
          let user = Address([0x42; 20]);
          let mut admitted = Vec::new();

          for nonce in submissions {
              if sequencer.check_and_advance(&user, nonce).await.is_ok() {
                  admitted.push(nonce);
              }
          }

          // No gaps, no repeats, strictly increasing from zero.
          let expected: Vec<u64> = (0..admitted.len() as u64).collect();
          assert_eq!(admitted, expected);
          assert_eq!(sequencer.next_expected(&user).await, admitted.len() as u64);
      });
  }

  /// A replayed nonce is rejected no matter how far the sequence advanced.
  #[test]
  fn prop_consumed_nonce_is_never_readmitted(
    advance_to in 1u64..30,
    replay in 0u64..30
  ) {
      let replay = replay % advance_to;
      let rt = tokio::runtime::Builder::new_current_thread()
          .build()
          .unwrap();
      rt.block_on(async {
          let sequencer = sequencer();
          let user = Address([0x42; 20]);
          for nonce in 0..advance_to {
              sequencer.check_and_advance(&user, nonce).await.unwrap();
          }
          assert!(sequencer.check_and_advance(&user, replay).await.is_err());
          // The rejection did not disturb the sequence.
          assert_eq!(sequencer.next_expected(&user).await, advance_to);
      });
  }

  /// Sequences are tracked per user; interleaving users never cross-talks.
  #[test]
  fn prop_users_are_isolated(
    count_a in 0u64..15,
    count_b in 0u64..15
  ) {
      let rt = tokio::runtime::Builder::new_current_thread()
          .build()
          .unwrap();
      rt.block_on(async {
          let sequencer = sequencer();
          let user_a = Address([0xaa; 20]);
          let user_b = Address([0xbb; 20]);

          for i in 0..count_a.max(count_b) {
              if i < count_a {
                  sequencer.check_and_advance(&user_a, i).await.unwrap();
              }
              if i < count_b {
                  sequencer.check_and_advance(&user_b, i).await.unwrap();
              }
          }

          assert_eq!(sequencer.next_expected(&user_a).await, count_a);
          assert_eq!(sequencer.next_expected(&user_b).await, count_b);
      });
  }
}
