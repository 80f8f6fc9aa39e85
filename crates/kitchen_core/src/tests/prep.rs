use super::*;

#[test]
fn test_pick_raw_ingredient_from_storage() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    // Chef 1 starts at (1, 2) facing the tomato storage above.
    let cmd = envelope(&state, 1, Command::Pick { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    match held(&state, &chef1()) {
        Some(Item::Ingredient(ing)) => {
            assert_eq!(ing.kind, "ing_tomato");
            assert_eq!(ing.state, PrepState::Raw);
        }
        other => panic!("expected raw tomato in hand, got {other:?}"),
    }
    assert!(events.iter().any(
        |e| matches!(&e.event, Event::ItemPicked { station, .. } if *station == TOMATO_STORAGE)
    ));
}

#[test]
fn test_storage_never_runs_out() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    let script = vec![
        (0, Command::Pick { chef: chef1() }),
        (1, Command::Throw { chef: chef1() }),
        (2, Command::Pick { chef: chef1() }),
    ];
    run_script(&mut state, &content, &mut rng, &script, 3);

    assert!(matches!(held(&state, &chef1()), Some(Item::Ingredient(_))));
}

#[test]
fn test_pick_with_full_hands_rejected() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    give(&mut state, &chef1(), Item::Plate(PlateItem::clean()));
    let cmd = envelope(&state, 1, Command::Pick { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::HandsFull));
    assert!(matches!(held(&state, &chef1()), Some(Item::Plate(_))));
}

#[test]
fn test_chop_takes_configured_delay() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    // Chef 2 at (2, 2) faces the cutting board above.
    give(&mut state, &chef2(), raw("ing_tomato"));
    let script = vec![
        (0, Command::Place { chef: chef2() }),
        (1, Command::Interact { chef: chef2() }),
    ];
    let events = run_script(&mut state, &content, &mut rng, &script, 5);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::ChopStarted { .. })));
    let finished = events
        .iter()
        .find(|e| matches!(e.event, Event::ChopFinished { .. }))
        .expect("chop should finish");
    // Started at tick 1, chop_ticks = 3.
    assert_eq!(finished.tick, 4);
    assert!(!state.chefs[&chef2()].is_busy());
    match station(&state, CUTTING) {
        Station::Cutting { slot: Some(ing) } => assert_eq!(ing.state, PrepState::Chopped),
        other => panic!("expected chopped ingredient on the board, got {other:?}"),
    }
}

#[test]
fn test_chef_is_busy_for_whole_chop() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    give(&mut state, &chef2(), raw("ing_tomato"));
    let script = vec![
        (0, Command::Place { chef: chef2() }),
        (1, Command::Interact { chef: chef2() }),
        (
            2,
            Command::Move {
                chef: chef2(),
                direction: Direction::Down,
            },
        ),
    ];
    let events = run_script(&mut state, &content, &mut rng, &script, 3);

    assert!(rejected_with(&events, &RejectReason::Busy));
    assert_eq!(state.chefs[&chef2()].position, Position::new(2, 2));
    assert_eq!(
        ChefStateView::of(&state.chefs[&chef2()]),
        ChefStateView::BusyCutting
    );
}

#[test]
fn test_unchoppable_ingredient_refused_by_board() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    give(&mut state, &chef2(), raw("ing_rice"));
    let cmd = envelope(&state, 1, Command::Place { chef: chef2() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::StationRefused));
    assert!(matches!(held(&state, &chef2()), Some(Item::Ingredient(_))));
}

#[test]
fn test_interact_on_chopped_ingredient_picks_it_up() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    if let Some(Station::Cutting { slot }) = station_at_mut(&mut state.stations, CUTTING) {
        *slot = Some(IngredientItem {
            kind: "ing_tomato".to_string(),
            state: PrepState::Chopped,
        });
    }
    let cmd = envelope(&state, 1, Command::Interact { chef: chef2() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(
        !events.iter().any(|e| matches!(e.event, Event::ChopStarted { .. })),
        "already-chopped ingredient must not restart the chop"
    );
    assert!(matches!(held(&state, &chef2()), Some(Item::Ingredient(ing)) if ing.state == PrepState::Chopped));
}

#[test]
fn test_wash_dirty_plate_to_clean() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    put_chef(&mut state, &chef1(), Position::new(1, 3), Direction::Down);
    give(&mut state, &chef1(), Item::Plate(PlateItem::dirty()));
    let script = vec![
        (0, Command::Place { chef: chef1() }),
        (1, Command::Interact { chef: chef1() }),
        (5, Command::Pick { chef: chef1() }),
    ];
    let events = run_script(&mut state, &content, &mut rng, &script, 6);

    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::WashStarted { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::SoundCue { cue: SoundCue::Wash })));
    assert!(events
        .iter()
        .any(|e| matches!(e.event, Event::WashFinished { .. })));
    match held(&state, &chef1()) {
        Some(Item::Plate(plate)) => assert_eq!(plate.state, PlateState::Clean),
        other => panic!("expected clean plate in hand, got {other:?}"),
    }
}

#[test]
fn test_wash_takes_one_scrub_per_tick() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    put_chef(&mut state, &chef1(), Position::new(1, 3), Direction::Down);
    give(&mut state, &chef1(), Item::Plate(PlateItem::dirty()));
    let script = vec![
        (0, Command::Place { chef: chef1() }),
        (1, Command::Interact { chef: chef1() }),
    ];
    let events = run_script(&mut state, &content, &mut rng, &script, 4);

    let finished = events
        .iter()
        .find(|e| matches!(e.event, Event::WashFinished { .. }))
        .expect("wash should finish");
    // Started at tick 1 with wash_scrubs = 3, one scrub per tick.
    assert_eq!(finished.tick, 3);
}

#[test]
fn test_clean_plate_refused_by_sink() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    put_chef(&mut state, &chef1(), Position::new(1, 3), Direction::Down);
    give(&mut state, &chef1(), Item::Plate(PlateItem::clean()));
    let cmd = envelope(&state, 1, Command::Place { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);

    assert!(rejected_with(&events, &RejectReason::StationRefused));
    assert!(matches!(held(&state, &chef1()), Some(Item::Plate(_))));
}

#[test]
fn test_plate_storage_stack_pops_and_empties() {
    let content = base_content();
    let mut state = base_state(&content);
    let mut rng = make_rng();

    if let Some(Station::PlateStorage { stack }) = station_at_mut(&mut state.stations, PLATE_STORAGE)
    {
        stack.truncate(1);
    }
    put_chef(&mut state, &chef1(), Position::new(2, 3), Direction::Down);

    let cmd = envelope(&state, 1, Command::Pick { chef: chef1() });
    run_tick(&mut state, &[cmd], &content, &mut rng);
    assert!(matches!(held(&state, &chef1()), Some(Item::Plate(_))));

    state.chefs.get_mut(&chef1()).unwrap().held = None;
    let cmd = envelope(&state, 2, Command::Pick { chef: chef1() });
    let events = run_tick(&mut state, &[cmd], &content, &mut rng);
    assert!(rejected_with(&events, &RejectReason::PlateStorageEmpty));
}
