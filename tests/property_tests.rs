//! Property tests for codec robustness and path table invariants.

use proptest::prelude::*;

use switchnet::codec::{self, MAX_PINS};
use switchnet::paths::{PathTable, UNKNOWN_PATH};
use switchnet::ports::SwitchPin;
use switchnet::sim::SimPin;

fn bank(n: usize, high: bool) -> Vec<SimPin> {
    (0..n)
        .map(|i| {
            let mut pin = SimPin::new(i as u8);
            pin.set(high);
            pin
        })
        .collect()
}

fn states(pins: &mut [SimPin]) -> Vec<bool> {
    pins.iter_mut().map(SwitchPin::get).collect()
}

fn to_bits(states: &[bool]) -> String {
    states.iter().map(|&s| if s { '1' } else { '0' }).collect()
}

// ── Codec properties ──────────────────────────────────────────

proptest! {
    /// Any width-matched binary command is applied exactly, and the reply
    /// (when requested) echoes precisely those bits.
    #[test]
    fn valid_commands_apply_exactly(
        desired in proptest::collection::vec(any::<bool>(), 1..=MAX_PINS),
    ) {
        let bits = to_bits(&desired);
        let mut pins = bank(desired.len(), false);

        prop_assert_eq!(codec::decode_and_apply(&bits, &mut pins), None);
        prop_assert_eq!(states(&mut pins), desired.clone());

        let reply = codec::decode_and_apply(&format!("{bits}!"), &mut pins);
        prop_assert_eq!(reply, Some(format!("STATES:{bits}\n")));
        prop_assert_eq!(states(&mut pins), desired);
    }

    /// Applying the same command twice is idempotent in both pin state and
    /// reply.
    #[test]
    fn reapplication_is_idempotent(
        desired in proptest::collection::vec(any::<bool>(), 1..=MAX_PINS),
    ) {
        let line = format!("{}!", to_bits(&desired));
        let mut pins = bank(desired.len(), false);

        let first = codec::decode_and_apply(&line, &mut pins);
        let first_states = states(&mut pins);
        let second = codec::decode_and_apply(&line, &mut pins);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_states, states(&mut pins));
    }

    /// A width mismatch never mutates a pin and never yields a reply.
    #[test]
    fn wrong_width_commands_are_inert(
        sent in proptest::collection::vec(any::<bool>(), 0..=MAX_PINS),
        pin_count in 1usize..=MAX_PINS,
        verify in any::<bool>(),
    ) {
        prop_assume!(sent.len() != pin_count);
        let mut line = to_bits(&sent);
        if verify {
            line.push('!');
        }
        let mut pins = bank(pin_count, true);

        prop_assert_eq!(codec::decode_and_apply(&line, &mut pins), None);
        prop_assert_eq!(states(&mut pins), vec![true; pin_count]);
    }

    /// Any line containing a non-digit byte is dropped before a single pin
    /// is touched.
    #[test]
    fn noise_lines_are_inert(line in "[01]{0,8}[a-zA-Z:;.!#]+[0-9]{0,8}") {
        prop_assume!(line.strip_suffix('!').unwrap_or(&line)
            .chars().any(|c| !c.is_ascii_digit()));
        let mut pins = bank(7, true);
        prop_assert_eq!(codec::decode_and_apply(&line, &mut pins), None);
        prop_assert_eq!(states(&mut pins), vec![true; 7]);
    }

    /// An out-of-range decimal digit aborts mid-application: pins strictly
    /// before it take their commanded values, pins from it onward keep
    /// their prior state, and no reply is emitted.
    #[test]
    fn bad_digit_preserves_partial_application(
        prefix in proptest::collection::vec(any::<bool>(), 0..=6),
        bad in 2u8..=9,
        verify in any::<bool>(),
    ) {
        let pin_count = 7;
        let mut line = to_bits(&prefix);
        line.push((b'0' + bad) as char);
        // Pad with zeros so the width check passes and the bad digit is
        // what stops the command.
        line.extend(std::iter::repeat_n('0', pin_count - prefix.len() - 1));
        if verify {
            line.push('!');
        }

        let mut pins = bank(pin_count, true);
        prop_assert_eq!(codec::decode_and_apply(&line, &mut pins), None);

        let got = states(&mut pins);
        prop_assert_eq!(&got[..prefix.len()], &prefix[..]);
        prop_assert_eq!(&got[prefix.len()..], &vec![true; pin_count - prefix.len()][..]);
    }
}

// ── Path table properties ─────────────────────────────────────

/// A random table: unique bit patterns of one width, generated names.
fn arb_table_entries() -> impl Strategy<Value = (usize, Vec<(String, String)>)> {
    (1usize..=7).prop_flat_map(|width| {
        // Can't ask for more unique patterns than the width can express.
        let max_entries = (1usize << width).min(8);
        proptest::collection::hash_set(0u32..(1 << width), 1..=max_entries).prop_map(move |patterns| {
            let entries = patterns
                .into_iter()
                .enumerate()
                .map(|(i, p)| (format!("P{i}"), format!("{p:0width$b}")))
                .collect();
            (width, entries)
        })
    })
}

proptest! {
    /// For every entry, name → bits → name round-trips, and the low-power
    /// entry exists exactly when an all-zero pattern is present.
    #[test]
    fn table_lookups_round_trip((width, entries) in arb_table_entries()) {
        let table = PathTable::new(entries.clone()).unwrap();
        prop_assert_eq!(table.width(), width);

        let mut expect_low_power = None;
        for (name, bits) in &entries {
            prop_assert_eq!(table.bits(name), Some(bits.as_str()));
            prop_assert_eq!(table.name_for(bits), name.as_str());
            if bits.chars().all(|c| c == '0') {
                expect_low_power = Some(name.as_str());
            }
        }
        prop_assert_eq!(table.low_power_name(), expect_low_power);
    }

    /// Bit patterns outside the table always resolve to the sentinel.
    #[test]
    fn foreign_bits_resolve_to_sentinel((width, entries) in arb_table_entries()) {
        let table = PathTable::new(entries.clone()).unwrap();
        let known: Vec<String> = entries.iter().map(|(_, b)| b.clone()).collect();
        for p in 0u32..(1 << width) {
            let bits = format!("{p:0width$b}");
            if !known.contains(&bits) {
                prop_assert_eq!(table.name_for(&bits), UNKNOWN_PATH);
            }
        }
    }
}
