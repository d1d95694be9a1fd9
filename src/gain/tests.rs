use approx::assert_abs_diff_eq;

use super::*;

fn gain(doy: f32, lat: f32, band: i64, ascending_node_time: f32) -> GainResult {
    select_gain_raw(
        doy,
        lat,
        band,
        Node::Descending,
        &OrbitParameters::new(ascending_node_time),
    )
    .unwrap()
}

#[test]
fn summer_solstice_swir() {
    let result = gain(172.0, 45.0, 4, 22.5);
    assert_eq!(result.level, GainLevel::High);
    assert_abs_diff_eq!(result.fraction, 0.36809, epsilon = 1e-3);
}

#[test]
fn reference_scenes() {
    // (doy, lat, band, node time, level, fraction)
    let cases = [
        (180.0, 60.0, 1, 22.5, GainLevel::Low1, 0.78125),
        (180.0, 59.0, 3, 21.0, GainLevel::Normal, 0.90317),
        (180.0, -39.0, 3, 21.0, GainLevel::High, 0.46931),
        (1.0, 0.0, 1, 22.5, GainLevel::Low1, 0.83360),
        (172.0, 45.0, 2, 22.5, GainLevel::Low1, 0.83131),
        (172.0, 45.0, 9, 22.5, GainLevel::High, 0.61947),
        (355.0, -45.0, 1, 22.5, GainLevel::Low1, 0.82158),
    ];

    for (doy, lat, band, time, level, fraction) in cases {
        let result = gain(doy, lat, band, time);
        assert_eq!(result.level, level, "doy {doy}, lat {lat}, band {band}");
        assert_abs_diff_eq!(result.fraction, fraction, epsilon = 1e-3);
    }
}

#[test]
fn polar_night_is_dark() {
    let result = gain(180.0, -80.0, 1, 22.5);
    assert_eq!(result.level, GainLevel::Dark);
    assert_eq!(result.fraction, 0.0);
    assert_eq!(result.gain_number(), 0.0);
}

#[test]
fn invalid_bands() {
    let orbit = OrbitParameters::default();
    for band in [0, 10, -1] {
        assert_eq!(
            select_gain_raw(1.0, 0.0, band, Node::Descending, &orbit),
            Err(GainError::InvalidBand(band))
        );
    }
}

#[test]
fn unreachable_latitude() {
    let orbit = OrbitParameters::default();
    assert_eq!(
        select_gain_raw(100.0, -85.0, 3, Node::Descending, &orbit),
        Err(GainError::UnreachableLatitude(-85.0))
    );
}

#[test]
fn all_outputs_in_range() {
    let orbit = OrbitParameters::default();
    for band in Band::ALL {
        for node in [Node::Ascending, Node::Descending] {
            for doy in (1..=366).step_by(5) {
                for lat in (-81..=81).step_by(3) {
                    let result = select_gain(doy as f32, lat as f32, band, node, &orbit).unwrap();
                    match result.level {
                        GainLevel::Bright | GainLevel::Dark => assert_eq!(result.fraction, 0.0),
                        _ => assert!(
                            (0.0..1.0).contains(&result.fraction),
                            "{band:?} {node:?} {doy} {lat}: {result:?}"
                        ),
                    }
                }
            }
        }
    }
}

#[test]
fn dimmer_scenes_never_need_less_sensitive_gains() {
    let orbit = OrbitParameters::default();
    for band in [2, 3] {
        let band = Band::new(band).unwrap();
        // From the northern summer solstice to the winter solstice the sun
        // only sinks at 45°N
        let levels: Vec<_> = (173..=355)
            .map(|doy| {
                select_gain(doy as f32, 45.0, band, Node::Descending, &orbit)
                    .unwrap()
                    .level
            })
            .collect();
        assert!(levels.windows(2).all(|w| w[1] <= w[0]), "{band:?}: {levels:?}");
        assert!(levels.first() > levels.last());
    }
}

#[test]
fn threshold_is_exclusive() {
    let ladder = [2.0, 1.0, 0.75, 0.5];

    // Exactly at the high gain limit steps down to normal
    let result = select_level(50.0, 100.0, &ladder);
    assert_eq!(result.level, GainLevel::Normal);
    assert_abs_diff_eq!(result.fraction, 0.5);

    let result = select_level(49.999, 100.0, &ladder);
    assert_eq!(result.level, GainLevel::High);

    // Exactly at the lowest limit is saturated everywhere
    let result = select_level(200.0, 100.0, &ladder);
    assert_eq!(result.level, GainLevel::Bright);
    assert_eq!(result.fraction, 0.0);
}

#[test]
fn missing_setting_is_never_chosen() {
    let ladder = constants(Band::new(1).unwrap()).gain_ladder;
    // Above the low1 limit for band 1 (427 / 0.75)
    let result = select_level(600.0, 427.0, &ladder);
    assert_eq!(result.level, GainLevel::Bright);

    let result = select_level(500.0, 427.0, &ladder);
    assert_eq!(result.level, GainLevel::Low1);
}

#[test]
fn zero_radiance_overrides_high_gain() {
    for band in Band::ALL {
        let c = constants(band);
        let result = select_level(0.0, c.saturation_radiance, &c.gain_ladder);
        assert_eq!(result.level, GainLevel::Dark);
        assert_eq!(result.fraction, 0.0);
    }
}

#[test]
fn gain_number_encoding() {
    let result = gain(180.0, 60.0, 1, 22.5);
    assert_abs_diff_eq!(result.gain_number(), 3.78125, epsilon = 1e-3);

    let bright = GainResult {
        level: GainLevel::Bright,
        fraction: 0.0,
    };
    assert_eq!(bright.gain_number(), 5.0);
}

#[test]
fn description() {
    let result = GainResult {
        level: GainLevel::Normal,
        fraction: 0.9824,
    };
    assert_eq!(result.to_string(), "norm gain at 98.24% saturation");
}

#[test]
fn level_indices_round_trip() {
    for index in 0..=5u8 {
        assert_eq!(GainLevel::try_from(index).unwrap().index(), index);
    }
    assert_eq!(GainLevel::try_from(6), Err(6));
}

#[test]
fn node_encoding() {
    assert_eq!(Node::try_from(1), Ok(Node::Ascending));
    assert_eq!(Node::try_from(-1), Ok(Node::Descending));
    assert_eq!(Node::try_from(0), Err(GainError::InvalidNode(0)));
    assert_eq!(Node::Descending.sign(), -1);
}
