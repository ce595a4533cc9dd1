//! Catalogue-wide invariants (T1-T4): every one of the 40 catalogued
//! modes must satisfy these regardless of family.

use sstv_core::catalogue::{all_modes, odd_parity_bit, VisDescriptor};

#[test]
fn given_every_catalogued_mode_when_summing_timing_then_line_duration_matches_components() {
    for mode in all_modes() {
        let t = &mode.timing;
        let summed = t.sync_ms + t.porches_ms.iter().sum::<f64>() + t.channel_scans_ms.iter().sum::<f64>();
        assert!(
            (mode.line_duration_ms() - summed).abs() < 1e-6,
            "{}: line_duration_ms {} != summed {}",
            mode.name,
            mode.line_duration_ms(),
            summed
        );
    }
}

#[test]
fn given_every_catalogued_mode_when_computing_body_duration_then_it_matches_line_count_times_duration() {
    for mode in all_modes() {
        let expected =
            mode.line_duration_ms() * mode.line_count as f64 / 1000.0 + mode.extra_first_line_sync_ms.unwrap_or(0.0) / 1000.0;
        assert!(
            (mode.body_duration_sec() - expected).abs() < 1e-9,
            "{}: body_duration_sec {} != expected {}",
            mode.name,
            mode.body_duration_sec(),
            expected
        );
    }
}

#[test]
fn given_every_standard_vis_code_when_checking_parity_then_population_count_is_even() {
    for mode in all_modes() {
        if let VisDescriptor::Standard { data7 } = mode.vis {
            let byte = VisDescriptor::standard_byte(data7);
            assert_eq!(
                byte.count_ones() % 2,
                0,
                "{}: standard VIS byte 0x{byte:02X} has odd population count",
                mode.name
            );
        }
    }
}

#[test]
fn given_every_extended_vis_payload_when_checking_parity_then_nine_bit_population_is_odd() {
    for mode in all_modes() {
        if let VisDescriptor::Extended { second_byte } = mode.vis {
            let parity = odd_parity_bit(second_byte);
            let nine_bit_population = second_byte.count_ones() + parity as u32;
            assert_eq!(
                nine_bit_population % 2,
                1,
                "{}: extended second byte 0x{second_byte:02X} parity {parity} yields even population",
                mode.name
            );
        }
    }
}

#[test]
fn given_the_full_catalogue_when_comparing_standard_vis_codes_then_none_collide() {
    let modes = all_modes();
    for (i, a) in modes.iter().enumerate() {
        let VisDescriptor::Standard { data7: a7 } = a.vis else { continue };
        for b in &modes[i + 1..] {
            let VisDescriptor::Standard { data7: b7 } = b.vis else { continue };
            assert_ne!(
                VisDescriptor::standard_byte(a7),
                VisDescriptor::standard_byte(b7),
                "{} and {} share a standard VIS byte",
                a.name,
                b.name
            );
        }
    }
}

#[test]
fn given_extended_vis_modes_when_comparing_second_bytes_then_none_collide_within_the_prefix() {
    let modes = all_modes();
    let extended: Vec<_> = modes
        .iter()
        .filter_map(|m| match m.vis {
            VisDescriptor::Extended { second_byte } => Some((m.name, second_byte)),
            _ => None,
        })
        .collect();
    for (i, (name_a, byte_a)) in extended.iter().enumerate() {
        for (name_b, byte_b) in &extended[i + 1..] {
            assert_ne!(byte_a, byte_b, "{name_a} and {name_b} share an extended VIS second byte");
        }
    }
}

#[test]
fn given_every_mode_when_looked_up_by_id_and_name_then_both_resolve_to_itself() {
    for mode in all_modes() {
        assert_eq!(sstv_core::get_mode_info(mode.id).id, mode.id);
        assert_eq!(sstv_core::find_mode_by_name(mode.name).map(|m| m.id), Some(mode.id));
    }
}
