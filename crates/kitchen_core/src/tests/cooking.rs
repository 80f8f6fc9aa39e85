use super::*;

fn pot(state: &GameState) -> &DeviceItem {
    match station(state, POT_STATION) {
        Station::Cooking {
            device: Some(device),
        } => device,
        other => panic!("expected a pot on the cooking station, got {other:?}"),
    }
}

fn at_pot(state: &mut GameState) {
    put_chef(state, &chef1(), Position::new(3, 2), Direction::Up);
}

fn at_pan(state: &mut GameState) {
    put_chef(state, &chef1(), Position::new(3, 3), Direction::Down);
}

#[test]
fn test_placing_raw_starch_starts_cooking() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(&e.event, Event::CookStarted { station, .. } if *station == POT_STATION)));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::SoundCue { cue: SoundCue::Boil })));
    let device = pot(&state);
    assert!(device.cooking);
    assert_eq!(device.contents.len(), 1);
    assert_eq!(device.contents[0].state, PrepState::Cooking);
    assert!(held(&state, &chef1()).is_none());
}

#[test]
fn test_cook_completes_after_cook_ticks() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let script = vec![(0, Command::Place { chef: chef1() })];
    let events = run_script(&mut state, &content, &mut rng, &script, 13);

    let finished = events
        .iter()
        .find(|e| matches!(e.event, Event::CookFinished { .. }))
        .expect("cook should finish");
    // Placed at tick 0, cook_ticks = 12.
    assert_eq!(finished.tick, 12);
    assert_eq!(pot(&state).contents[0].state, PrepState::Cooked);
}

#[test]
fn test_neglected_contents_burn() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let script = vec![(0, Command::Place { chef: chef1() })];
    let events = run_script(&mut state, &content, &mut rng, &script, 26);

    let burned = events
        .iter()
        .find(|e| matches!(e.event, Event::ContentsBurned { .. }))
        .expect("contents should burn");
    // cook_ticks + burn_ticks after placement.
    assert_eq!(burned.tick, 24);
    assert_eq!(pot(&state).contents[0].state, PrepState::Burned);
}

#[test]
fn test_picking_device_up_cancels_pending_timers() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let script = vec![
        (0, Command::Place { chef: chef1() }),
        (1, Command::Pick { chef: chef1() }),
    ];
    let events = run_script(&mut state, &content, &mut rng, &script, 30);

    assert!(
        !events.iter().any(|e| matches!(e.event, Event::CookFinished { .. })),
        "stale cook timer must not fire after pickup"
    );
    assert!(!events
        .iter()
        .any(|e| matches!(e.event, Event::ContentsBurned { .. })));
    match held(&state, &chef1()) {
        Some(Item::Device(device)) => {
            assert!(!device.cooking);
            assert_eq!(device.contents[0].state, PrepState::Cooking);
        }
        other => panic!("expected the pot in hand, got {other:?}"),
    }
}

#[test]
fn test_pot_refuses_non_starch() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_tomato"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::DeviceRefused));
    assert!(matches!(held(&state, &chef1()), Some(Item::Ingredient(_))));
    assert!(pot(&state).contents.is_empty());
}

#[test]
fn test_pan_takes_chopped_protein() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pan(&mut state);
    give(&mut state, &chef1(), chopped("ing_meat"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(&e.event, Event::CookStarted { station, .. } if *station == PAN_STATION)));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::SoundCue { cue: SoundCue::Fry })));
}

#[test]
fn test_pan_refuses_raw_ingredient() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pan(&mut state);
    give(&mut state, &chef1(), raw("ing_meat"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::DeviceRefused));
}

#[test]
fn test_full_device_rejects_more() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    // The pan has capacity 1.
    at_pan(&mut state);
    give(&mut state, &chef1(), chopped("ing_meat"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    run_tick(&mut state, &[cmd], &content, &mut rng);

    give(&mut state, &chef1(), chopped("ing_meat"));
    let cmd = envelope(&state, 2, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::DeviceFull));
}

#[test]
fn test_second_ingredient_joins_batch_without_restart() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let mut events = run_tick(&mut state, &[cmd], &content, &mut rng);

    give(&mut state, &chef1(), raw("ing_rice"));
    let cmd = envelope(&state, 2, Command::Place { chef: chef1() });
    events.extend(run_tick(&mut state, &[cmd], &content, &mut rng));

    let starts = events
        .iter()
        .filter(|e| matches!(e.event, Event::CookStarted { .. }))
        .count();
    assert_eq!(starts, 1, "joining an in-flight batch must not restart cooking");
    assert_eq!(pot(&state).contents.len(), 2);

    // Both ride the original timer.
    let events = run_script(&mut state, &content, &mut rng, &[], 13);
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::CookFinished { .. })));
    assert!(pot(&state)
        .contents
        .iter()
        .all(|i| i.state == PrepState::Cooked));
}

#[test]
fn test_cooked_batch_blocks_new_ingredients() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let script = vec![(0, Command::Place { chef: chef1() })];
    run_script(&mut state, &content, &mut rng, &script, 13);
    assert_eq!(pot(&state).contents[0].state, PrepState::Cooked);

    give(&mut state, &chef1(), raw("ing_rice"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::DeviceRefused));
}

#[test]
fn test_trash_destroys_loose_item() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    put_chef(&mut state, &chef1(), Position::new(4, 3), Direction::Down);
    give(&mut state, &chef1(), raw("ing_tomato"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::ItemTrashed { .. })));
    assert!(held(&state, &chef1()).is_none());
}

#[test]
fn test_trash_empties_device_but_returns_it() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    put_chef(&mut state, &chef1(), Position::new(4, 3), Direction::Down);
    let device = device_with("device_pot", &[("ing_rice", PrepState::Burned)]);
    give(&mut state, &chef1(), Item::Device(device));

    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::DeviceEmptied { .. })));
    match held(&state, &chef1()) {
        Some(Item::Device(device)) => {
            assert!(device.contents.is_empty());
            assert!(!device.cooking);
        }
        other => panic!("expected the emptied pot back in hand, got {other:?}"),
    }
}

#[test]
fn test_swapped_device_ignores_stale_timers() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    // Start the pot cooking at tick 0, then take it away at tick 1. Its
    // cook and burn timers (due 12 and 24) stay queued but point at a
    // batch that is gone.
    at_pot(&mut state);
    give(&mut state, &chef1(), raw("ing_rice"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let mut events = run_tick(&mut state, &[cmd], &content, &mut rng);
    let cmd = envelope(&state, 2, Command::Pick { chef: chef1() });
    events.extend(run_tick(&mut state, &[cmd], &content, &mut rng));

    // Swap a fresh pan onto the same station and start it at tick 3.
    give(&mut state, &chef1(), Item::Device(device_with("device_pan", &[])));
    let cmd = envelope(&state, 3, Command::Place { chef: chef1() });
    events.extend(run_tick(&mut state, &[cmd], &content, &mut rng));
    give(&mut state, &chef1(), chopped("ing_meat"));
    let cmd = envelope(&state, 4, Command::Place { chef: chef1() });
    events.extend(run_tick(&mut state, &[cmd], &content, &mut rng));

    events.extend(run_script(&mut state, &content, &mut rng, &[], 16));

    // Only the pan's own timer may fire: started at tick 3, due at 15.
    let finishes: Vec<_> = events
        .iter()
        .filter(|e| matches!(e.event, Event::CookFinished { .. }))
        .collect();
    assert_eq!(finishes.len(), 1, "stale pot timer must not fire");
    assert_eq!(finishes[0].tick, 15);
    assert!(matches!(
        &finishes[0].event,
        Event::CookFinished { device, .. } if device == "device_pan"
    ));
    match station(&state, POT_STATION) {
        Station::Cooking {
            device: Some(device),
        } => {
            assert_eq!(device.def_id, "device_pan");
            assert_eq!(device.contents[0].state, PrepState::Cooked);
        }
        other => panic!("expected the pan on the station, got {other:?}"),
    }
}

#[test]
fn test_throw_clears_held_device() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    let device = device_with("device_pot", &[("ing_rice", PrepState::Cooking)]);
    give(&mut state, &chef1(), Item::Device(device));
    let cmd = envelope(&state, 1, Command::Throw { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::DeviceEmptied { .. })));
    assert!(matches!(held(&state, &chef1()), Some(Item::Device(device)) if device.contents.is_empty()));
}

#[test]
fn test_throw_destroys_other_items() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    give(&mut state, &chef1(), raw("ing_tomato"));
    let cmd = envelope(&state, 1, Command::Throw { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::ItemTrashed { .. })));
    assert!(held(&state, &chef1()).is_none());
}

#[test]
fn test_throw_with_empty_hands_rejected() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    let cmd = envelope(&state, 1, Command::Throw { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::HandsEmpty));
}
